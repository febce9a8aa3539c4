pub mod encoding;
pub mod locations;
pub mod numerus;
pub mod pretranslate;
pub mod project;
pub mod qa;
pub mod rebuild;
pub mod stats;
pub mod translation_memory;
