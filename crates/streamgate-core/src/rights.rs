//! Capability rights understood by the stream API.
//!
//! Rights are flat labels compared by exact match. There is no hierarchy and
//! no wildcard: holding `delete_stream` says nothing about `get_stream`.

pub const GET_STREAM: &str = "get_stream";
pub const POST_STREAM: &str = "post_stream";
pub const DELETE_STREAM: &str = "delete_stream";
pub const GET_ALL_STREAMS: &str = "get_all_streams";
pub const CHANGE_PASSWORD: &str = "change_password";
pub const CREATE_USER: &str = "create_user";
pub const EDIT_USER: &str = "edit_user";
pub const DELETE_USER: &str = "delete_user";

/// Every right; granted to tokens issued through the login endpoint.
pub const ADMIN_RIGHTS: &[&str] = &[
    CHANGE_PASSWORD,
    CREATE_USER,
    EDIT_USER,
    DELETE_USER,
    GET_ALL_STREAMS,
    GET_STREAM,
    POST_STREAM,
    DELETE_STREAM,
];

/// Owned copy of [`ADMIN_RIGHTS`], handy for issuing.
pub fn admin_rights() -> Vec<String> {
    ADMIN_RIGHTS.iter().map(|r| r.to_string()).collect()
}
