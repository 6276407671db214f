use crate::{
    buffer::{Buffer, Ownership},
    primitive::attribute::{Attribute, ComponentType},
};

#[derive(Debug, thiserror::Error)]
pub enum AttributeError {
    #[error("cannot construct MeshAttribute with zero components per element")]
    ZeroComponents,
    #[error("byte stride {stride} is smaller than the {required} bytes required per element")]
    Stride { stride: usize, required: usize },
    #[error("byte stride {0} is not a multiple of the component size")]
    Alignment(usize),
    #[error("buffer of {length} bytes is not a whole number of {stride}-byte elements")]
    Size { length: usize, stride: usize },
    #[error("cannot view MeshAttribute as slice of requested type (width mismatch: {expected} != {actual})")]
    Width { expected: usize, actual: usize },
    #[error("cannot view MeshAttribute as slice of requested type (component mismatch)")]
    Component,
    #[error("cannot view interleaved MeshAttribute as a contiguous slice")]
    Interleaved,
}

/// One typed stream of vertex data.
///
/// # Invariants
///
/// * `count == buffer.byte_length() / byte_stride`
/// * `byte_stride >= components_per_attribute * component_type.size()`
#[derive(Debug, Clone, PartialEq)]
pub struct MeshAttribute<'src> {
    name: String,
    buffer: Buffer<'src, f32>,
    component_type: ComponentType,
    components_per_attribute: usize,
    byte_stride: usize,
    count: usize,
}

impl<'src> MeshAttribute<'src> {
    pub fn new(
        name: impl Into<String>,
        buffer: Buffer<'src, f32>,
        components_per_attribute: usize,
        byte_stride: usize,
    ) -> Result<Self, AttributeError> {
        let component_type = ComponentType::F32;
        if components_per_attribute == 0 {
            return Err(AttributeError::ZeroComponents);
        }
        let required = components_per_attribute * component_type.size();
        if byte_stride < required {
            return Err(AttributeError::Stride {
                stride: byte_stride,
                required,
            });
        }
        if byte_stride % component_type.size() != 0 {
            return Err(AttributeError::Alignment(byte_stride));
        }
        let length = buffer.byte_length();
        if length % byte_stride != 0 {
            return Err(AttributeError::Size {
                length,
                stride: byte_stride,
            });
        }
        Ok(Self {
            name: name.into(),
            count: length / byte_stride,
            buffer,
            component_type,
            components_per_attribute,
            byte_stride,
        })
    }

    /// Construct an attribute whose elements are tightly packed.
    pub fn packed(
        name: impl Into<String>,
        buffer: impl Into<Buffer<'src, f32>>,
        components_per_attribute: usize,
    ) -> Result<Self, AttributeError> {
        Self::new(
            name,
            buffer.into(),
            components_per_attribute,
            components_per_attribute * ComponentType::F32.size(),
        )
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn buffer(&self) -> &Buffer<'src, f32> {
        &self.buffer
    }

    #[inline]
    pub fn ownership(&self) -> Ownership {
        self.buffer.ownership()
    }

    #[inline(always)]
    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    #[inline(always)]
    pub fn components_per_attribute(&self) -> usize {
        self.components_per_attribute
    }

    #[inline(always)]
    pub fn byte_stride(&self) -> usize {
        self.byte_stride
    }

    /// Number of elements.
    #[inline(always)]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Distance between the starts of consecutive elements, in components.
    #[inline]
    fn stride_components(&self) -> usize {
        self.byte_stride / self.component_type.size()
    }

    /// The components of a single element.
    pub fn element(&self, index: usize) -> Option<&[f32]> {
        if index >= self.count {
            return None;
        }
        let start = index * self.stride_components();
        self.buffer
            .get(start..start + self.components_per_attribute)
    }

    pub fn elements(&self) -> impl ExactSizeIterator<Item = &[f32]> + '_ {
        let width = self.components_per_attribute;
        self.buffer
            .chunks_exact(self.stride_components())
            .map(move |el| &el[..width])
    }

    /// Mutable access to each element, promoting a borrowed buffer to an owned one first.
    pub fn elements_mut(&mut self) -> impl ExactSizeIterator<Item = &mut [f32]> + '_ {
        let width = self.components_per_attribute;
        let stride = self.stride_components();
        self.buffer
            .to_mut()
            .chunks_exact_mut(stride)
            .map(move |el| &mut el[..width])
    }

    fn check_view<T: Attribute>(&self) -> Result<(), AttributeError> {
        if T::COMPONENT != self.component_type {
            return Err(AttributeError::Component);
        }
        if T::COMPONENTS != self.components_per_attribute {
            return Err(AttributeError::Width {
                expected: self.components_per_attribute,
                actual: T::COMPONENTS,
            });
        }
        if std::mem::size_of::<T>() != self.byte_stride {
            return Err(AttributeError::Interleaved);
        }
        Ok(())
    }

    /// Try to borrow the elements as a `[T]`, where `T` matches this attribute's layout.
    #[allow(unsafe_code)]
    pub fn try_view<T: Attribute>(&self) -> Result<&[T], AttributeError> {
        self.check_view::<T>()?;
        let data: &[f32] = &self.buffer;
        // safety: `T` is `COMPONENTS` packed f32s with f32 alignment, the stride equals its size,
        // and the buffer holds exactly `count` strides
        Ok(unsafe { std::slice::from_raw_parts(data.as_ptr() as *const T, self.count) })
    }

    /// Mutable counterpart of [Self::try_view]; promotes a borrowed buffer to an owned one.
    #[allow(unsafe_code)]
    pub fn try_view_mut<T: Attribute>(&mut self) -> Result<&mut [T], AttributeError> {
        self.check_view::<T>()?;
        let count = self.count;
        let data = self.buffer.to_mut();
        // safety: see `try_view`
        Ok(unsafe { std::slice::from_raw_parts_mut(data.as_mut_ptr() as *mut T, count) })
    }

    /// Per-component minimum and maximum over all elements, or `None` if there are no elements.
    pub fn bounds(&self) -> Option<(Vec<f32>, Vec<f32>)> {
        let mut elements = self.elements();
        let first = elements.next()?;
        let (mut min, mut max) = (first.to_vec(), first.to_vec());
        for el in elements {
            for (c, v) in el.iter().enumerate() {
                min[c] = min[c].min(*v);
                max[c] = max[c].max(*v);
            }
        }
        Some((min, max))
    }

    /// Detach from the source lifetime, copying borrowed data if necessary.
    pub fn into_owned(self) -> MeshAttribute<'static> {
        MeshAttribute {
            name: self.name,
            buffer: self.buffer.into_owned(),
            component_type: self.component_type,
            components_per_attribute: self.components_per_attribute,
            byte_stride: self.byte_stride,
            count: self.count,
        }
    }
}
