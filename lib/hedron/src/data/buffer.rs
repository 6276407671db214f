use std::ops::Deref;

/// Whether a [Buffer] owns its data or views memory owned elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// A view into memory owned by the source scene; never released by this library.
    Borrowed,
    /// An allocation made during conversion; released when the buffer is dropped.
    Owned,
}

/// A contiguous run of elements which either borrows from the source scene or owns its data.
///
/// The ownership tag is carried by the variant itself, so it cannot be lost or defaulted: views
/// produced from source data stay [Buffer::Borrowed] until something needs to write to them, at
/// which point [Buffer::to_mut] copies them into an owned allocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Buffer<'src, T> {
    Borrowed(&'src [T]),
    Owned(Vec<T>),
}

impl<'src, T> Default for Buffer<'src, T> {
    fn default() -> Self {
        Self::Owned(Vec::new())
    }
}

impl<'src, T> From<&'src [T]> for Buffer<'src, T> {
    fn from(value: &'src [T]) -> Self {
        Self::Borrowed(value)
    }
}

impl<'src, T> From<Vec<T>> for Buffer<'src, T> {
    fn from(value: Vec<T>) -> Self {
        Self::Owned(value)
    }
}

impl<'src, T> Deref for Buffer<'src, T> {
    type Target = [T];
    fn deref(&self) -> &Self::Target {
        match self {
            Self::Borrowed(data) => data,
            Self::Owned(data) => data,
        }
    }
}

impl<'src, T> Buffer<'src, T> {
    #[inline]
    pub fn ownership(&self) -> Ownership {
        match self {
            Self::Borrowed(_) => Ownership::Borrowed,
            Self::Owned(_) => Ownership::Owned,
        }
    }

    #[inline]
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    /// Size of the viewed data, in bytes.
    #[inline]
    pub fn byte_length(&self) -> usize {
        self.len() * std::mem::size_of::<T>()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self
    }
}

impl<'src, T: Clone> Buffer<'src, T> {
    /// Mutable access to the data, copying a borrowed view into an owned allocation first.
    pub fn to_mut(&mut self) -> &mut Vec<T> {
        if let Self::Borrowed(data) = *self {
            tracing::trace!(len = data.len(), "promoting borrowed buffer to owned");
            *self = Self::Owned(data.to_vec());
        }
        match self {
            Self::Owned(data) => data,
            Self::Borrowed(_) => unreachable!(),
        }
    }

    /// Detach from the source lifetime, copying borrowed data if necessary.
    pub fn into_owned(self) -> Buffer<'static, T> {
        match self {
            Self::Borrowed(data) => Buffer::Owned(data.to_vec()),
            Self::Owned(data) => Buffer::Owned(data),
        }
    }
}
