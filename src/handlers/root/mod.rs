// handlers/root/mod.rs - Platform-admin handlers
//
// /api/root/* endpoints, guarded by root_auth_middleware. They read the
// central directory and the pool manager and skip host resolution.

pub mod tenant;
