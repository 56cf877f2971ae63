//! Flutter Assist - scaffolding helper for Flutter projects
//!
//! Keeps catalogs of packages and file templates next to the binary and
//! applies them to projects generated with `flutter create`.

pub mod core;
