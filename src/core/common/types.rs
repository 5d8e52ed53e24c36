/// Fixed-length numeric coordinate vector summarizing a record.
///
/// For color matching this holds one coordinate per channel (D = 3), but the
/// indexes accept any dimensionality agreed at build time.
pub type Descriptor = Vec<f64>;

/// A reference entry: a descriptor plus the owned payload it summarizes.
///
/// The payload is moved into whichever index node ends up storing it and is
/// returned by reference on query.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<P> {
    pub descriptor: Descriptor,
    pub payload: P,
}

impl<P> Record<P> {
    /// Creates a record from a descriptor and its payload.
    pub fn new(descriptor: Descriptor, payload: P) -> Self {
        Self { descriptor, payload }
    }
}
