//! Token commands.
//!
//! `streamgate token issue` - Issue a token for a user.
//! `streamgate token inspect` - Decrypt a token and print its claims.
//! `streamgate token validate` - Check a token grants a right to a user.

use super::{inline_or_file, resolve_key};
use chrono::Utc;
use std::fs;
use std::path::PathBuf;
use streamgate_core::rights::admin_rights;
use streamgate_core::{AppIdentity, ClaimFormat, expiry_after, parse_duration};
use streamgate_token::{ClaimSet, TokenCodec, fingerprint, inspect_token_unverified};

/// Issue a token for `subject`. With no rights given, grants every right.
pub fn issue(
    key: Option<String>,
    subject: String,
    rights: Vec<String>,
    expires: String,
    format: ClaimFormat,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let key = resolve_key(key)?;
    let codec = TokenCodec::new(&key, AppIdentity::current(), format)?;

    let rights = if rights.is_empty() {
        admin_rights()
    } else {
        rights
    };
    let lifetime = parse_duration(&expires)?;
    let expiry = expiry_after(Utc::now(), lifetime)?;
    let token = codec.issue(&subject, &rights, expiry)?;

    if let Some(output_path) = output {
        fs::write(&output_path, &token)?;
        println!("✔ Token written to: {}", output_path.display());
        println!("  Subject: {subject}");
        println!("  Rights: {}", rights.join(", "));
        println!("  Expires in: {expires}");
        println!("  Fingerprint: {}", fingerprint(&token));
    } else {
        println!("{token}");
    }

    Ok(())
}

/// Print a token's claims without checking them.
pub fn inspect(key: Option<String>, token: String, format: ClaimFormat) -> anyhow::Result<()> {
    let key = resolve_key(key)?;
    let token = inline_or_file(token)?;

    let claims = inspect_token_unverified(&token, &key, format)?;
    print_claims(&claims);
    println!("  Fingerprint: {}", fingerprint(&token));
    if claims.is_expired_at(Utc::now()) {
        println!();
        println!("⚠️  Token has expired");
    }

    Ok(())
}

/// Validate a token for `right` and `subject`; fails if it does not pass.
pub fn validate(
    key: Option<String>,
    token: String,
    right: String,
    subject: String,
    format: ClaimFormat,
) -> anyhow::Result<()> {
    let key = resolve_key(key)?;
    let token = inline_or_file(token)?;
    let codec = TokenCodec::new(&key, AppIdentity::current(), format)?;

    match codec.verify(&token, &right, &subject) {
        Ok(claims) => {
            println!("✔ Token is valid");
            println!();
            print_claims(&claims);
            Ok(())
        }
        Err(reason) => anyhow::bail!("✖ Token validation failed: {reason}"),
    }
}

fn print_claims(claims: &ClaimSet) {
    println!("Token Details:");
    println!("  Subject: {}", claims.subject);
    println!("  Application: {} {}", claims.app.name, claims.app.version);
    println!("  Issued at: {}", claims.issued_at);
    println!("  Expires at: {}", claims.expires_at);
    println!("  Rights: {}", claims.rights.join(", "));
}
