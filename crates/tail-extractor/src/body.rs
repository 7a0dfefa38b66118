//! Carrier capability: objects that own a readable body.
//!
//! The extractor only ever reads the body; everything else on the carrier
//! (status, headers) stays untouched and available to the caller.

use std::io::Read;

/// Something that exposes a readable body, such as an HTTP response.
pub trait ReadableBody {
    type Body: Read + ?Sized;

    /// Mutable access to the body stream.
    fn body_mut(&mut self) -> &mut Self::Body;
}

impl ReadableBody for reqwest::blocking::Response {
    type Body = Self;

    fn body_mut(&mut self) -> &mut Self::Body {
        self
    }
}

/// The tail of a carrier's body together with the carrier itself.
#[derive(Debug)]
pub struct Extraction<C> {
    pub tail: crate::Tail,
    pub carrier: C,
}

impl<C> Extraction<C> {
    /// Splits into the tail and the carrier.
    pub fn into_parts(self) -> (crate::Tail, C) {
        (self.tail, self.carrier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_readable_body<T: ReadableBody>() {}

    #[test]
    fn blocking_response_is_readable_body() {
        assert_readable_body::<reqwest::blocking::Response>();
    }
}
