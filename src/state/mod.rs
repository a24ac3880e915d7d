/// State management module
///
/// This module handles all application state, including:
/// - The catalog snapshot, thumbnail cache, and selection (session.rs)

pub mod session;
