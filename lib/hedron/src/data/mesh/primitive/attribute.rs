use nalgebra::{Point2, Point3, Point4, Vector3};

pub mod storage;

/// The role a vertex attribute plays.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Semantic {
    Position,
    Normal,
    Color,
    Texcoord,
    Tangent,
    Binormal,
    Joint,
    Weight,
}

impl Semantic {
    /// Upper-case name, as used by GL-style attribute naming.
    pub const fn name(self) -> &'static str {
        match self {
            Semantic::Position => "POSITION",
            Semantic::Normal => "NORMAL",
            Semantic::Color => "COLOR",
            Semantic::Texcoord => "TEXCOORD",
            Semantic::Tangent => "TANGENT",
            Semantic::Binormal => "BINORMAL",
            Semantic::Joint => "JOINT",
            Semantic::Weight => "WEIGHT",
        }
    }
}

impl std::fmt::Display for Semantic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A [Semantic] together with the number of one of its attribute sets (ex. the second UV channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeKey {
    pub semantic: Semantic,
    pub set: u32,
}

impl AttributeKey {
    #[inline]
    pub const fn new(semantic: Semantic, set: u32) -> Self {
        Self { semantic, set }
    }
}

impl std::fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.semantic, self.set)
    }
}

/// Numeric type of the components of stored attribute values.
///
/// Only [ComponentType::F32] is ever stored; [ComponentType::F64] is recognized so that
/// double-precision source data can be identified and reported, but it is never converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    F32,
    F64,
}

impl ComponentType {
    pub const fn alignment(self) -> usize {
        use std::mem::align_of;
        match self {
            ComponentType::F32 => align_of::<f32>(),
            ComponentType::F64 => align_of::<f64>(),
        }
    }

    pub const fn size(self) -> usize {
        use std::mem::size_of;
        match self {
            ComponentType::F32 => size_of::<f32>(),
            ComponentType::F64 => size_of::<f64>(),
        }
    }

    /// Whether attributes of this type can be produced.
    pub const fn is_supported(self) -> bool {
        matches!(self, ComponentType::F32)
    }

    /// The GL enum value for this type (`GL_FLOAT`, `GL_DOUBLE`).
    pub const fn to_gl(self) -> u32 {
        match self {
            ComponentType::F32 => 5126,
            ComponentType::F64 => 5130,
        }
    }
}

/// Trait for types which can be used as a typed view of one element of a [storage::MeshAttribute].
///
/// # Safety
///
/// Implementing types *must* be laid out as exactly `COMPONENTS` contiguous values of the type
/// described by `COMPONENT`, with that type's alignment.
#[allow(unsafe_code)]
pub unsafe trait Attribute: Sized {
    const COMPONENTS: usize;
    const COMPONENT: ComponentType;
}

mod _impl_attr {
    use super::{Attribute, ComponentType};

    /// Implement [Attribute] for `$Target`, asserting at compile time that its layout matches `$n`
    /// components of `f32`.
    macro_rules! impl_attr {
        ($n:literal => $($Target:ty),+) => {
            $(
               const _: () = { // anonymous module
                static_assertions::const_assert_eq!(std::mem::size_of::<$Target>(), $n * ComponentType::F32.size());
                static_assertions::const_assert_eq!(std::mem::align_of::<$Target>(), ComponentType::F32.alignment());
                #[allow(unsafe_code)]
                unsafe impl Attribute for $Target {
                    const COMPONENTS: usize = $n;
                    const COMPONENT: ComponentType = ComponentType::F32;
                }
               };
            )+
        };
    }

    impl_attr!(1 => f32, [f32; 1]);
    impl_attr!(2 => nalgebra::Vector2<f32>, nalgebra::Point2<f32>, [f32; 2]);
    impl_attr!(3 => nalgebra::Vector3<f32>, nalgebra::Point3<f32>, [f32; 3]);
    impl_attr!(4 => nalgebra::Vector4<f32>, nalgebra::Point4<f32>, [f32; 4]);
}

pub type Position = Point3<f32>;
pub type Normal = Vector3<f32>;
pub type Texcoord = Point2<f32>;
pub type Rgb = Point3<f32>;
pub type Rgba = Point4<f32>;
