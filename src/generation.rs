use futures::future::BoxFuture;
use std::sync::Arc;

use crate::error::Result;

/// A text-generation service: takes a prompt, returns generated text or fails.
///
/// Implementors report every failure (transport, quota, unusable response) as an
/// `Err`; the batch runner turns those into per-row error text.
pub trait TextGenerator: Send + Sync {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
        (**self).generate(prompt)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
        (**self).generate(prompt)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
        (**self).generate(prompt)
    }
}
