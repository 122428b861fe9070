//! End-to-end tests driving the QuickShare router.

mod helpers;

mod delete_test;
mod expiry_test;
mod file_test;
mod share_test;
