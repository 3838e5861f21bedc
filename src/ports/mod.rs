pub mod content_provider;
