//! Primitive types and their classification predicates

/// Primitive type, spelled exactly like its source keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Bool,
    Byte,
    UByte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
}

impl Type {
    // ==================== Type queries ====================

    /// Is this one of the eight integer types?
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Type::Byte
                | Type::UByte
                | Type::Short
                | Type::UShort
                | Type::Int
                | Type::UInt
                | Type::Long
                | Type::ULong
        )
    }

    /// Is this a floating-point type?
    pub fn is_floating_point(&self) -> bool {
        matches!(self, Type::Float | Type::Double)
    }

    /// Does this type carry a sign? Floating-point types do.
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            Type::Byte | Type::Short | Type::Int | Type::Long | Type::Float | Type::Double
        )
    }

    /// Integer or floating-point
    pub fn is_number(&self) -> bool {
        self.is_integer() || self.is_floating_point()
    }

    /// Largest value a non-negative literal of this integer type may hold.
    ///
    /// Literals are always non-negative at this stage; negation is an
    /// operator, so signed bounds are the positive maxima.
    pub fn integer_max(&self) -> Option<u64> {
        match self {
            Type::Byte => Some(i8::MAX as u64),
            Type::UByte => Some(u8::MAX as u64),
            Type::Short => Some(i16::MAX as u64),
            Type::UShort => Some(u16::MAX as u64),
            Type::Int => Some(i32::MAX as u64),
            Type::UInt => Some(u32::MAX as u64),
            Type::Long => Some(i64::MAX as u64),
            Type::ULong => Some(u64::MAX),
            _ => None,
        }
    }

    /// Source keyword for this type
    pub fn name(&self) -> &'static str {
        match self {
            Type::Void => "void",
            Type::Bool => "bool",
            Type::Byte => "byte",
            Type::UByte => "ubyte",
            Type::Short => "short",
            Type::UShort => "ushort",
            Type::Int => "int",
            Type::UInt => "uint",
            Type::Long => "long",
            Type::ULong => "ulong",
            Type::Float => "float",
            Type::Double => "double",
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
