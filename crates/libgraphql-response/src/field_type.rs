use crate::ObjectShape;
use crate::ScalarKind;

fn default_nullable() -> bool {
    true
}

/// The declared GraphQL type of a selected field.
///
/// Nullability is attached at every level, so `[Int]!` is a non-nullable
/// [`FieldType::List`] wrapping a nullable [`FieldType::Scalar`]. The
/// constructors produce nullable types; chain [`FieldType::non_null`] to get
/// the `!` form:
///
/// ```
/// use libgraphql_response::FieldType;
///
/// // [Int]!
/// let ty = FieldType::list(FieldType::int()).non_null();
/// assert_eq!(ty.to_graphql_string(), "[Int]!");
/// ```
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum FieldType {
    #[serde(rename_all = "camelCase")]
    CustomScalar {
        name: String,
        #[serde(default = "default_nullable")]
        nullable: bool,
    },

    #[serde(rename_all = "camelCase")]
    List {
        of_type: Box<FieldType>,
        #[serde(default = "default_nullable")]
        nullable: bool,
    },

    #[serde(rename_all = "camelCase")]
    Object {
        shape: Box<ObjectShape>,
        #[serde(default = "default_nullable")]
        nullable: bool,
    },

    #[serde(rename_all = "camelCase")]
    Scalar {
        scalar: ScalarKind,
        #[serde(default = "default_nullable")]
        nullable: bool,
    },
}
impl FieldType {
    pub fn boolean() -> Self {
        Self::scalar(ScalarKind::Boolean)
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self::CustomScalar {
            name: name.into(),
            nullable: true,
        }
    }

    pub fn enum_value() -> Self {
        Self::scalar(ScalarKind::Enum)
    }

    pub fn float() -> Self {
        Self::scalar(ScalarKind::Float)
    }

    pub fn id() -> Self {
        Self::scalar(ScalarKind::Id)
    }

    pub fn int() -> Self {
        Self::scalar(ScalarKind::Int)
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            Self::CustomScalar { nullable, .. }
            | Self::List { nullable, .. }
            | Self::Object { nullable, .. }
            | Self::Scalar { nullable, .. } => *nullable,
        }
    }

    pub fn list(of_type: FieldType) -> Self {
        Self::List {
            of_type: Box::new(of_type),
            nullable: true,
        }
    }

    pub fn long() -> Self {
        Self::scalar(ScalarKind::Long)
    }

    /// Returns this type with its outermost level made non-nullable.
    pub fn non_null(mut self) -> Self {
        match &mut self {
            Self::CustomScalar { nullable, .. }
            | Self::List { nullable, .. }
            | Self::Object { nullable, .. }
            | Self::Scalar { nullable, .. } => *nullable = false,
        }
        self
    }

    pub fn object(shape: ObjectShape) -> Self {
        Self::Object {
            shape: Box::new(shape),
            nullable: true,
        }
    }

    pub fn scalar(scalar: ScalarKind) -> Self {
        Self::Scalar {
            scalar,
            nullable: true,
        }
    }

    pub fn string() -> Self {
        Self::scalar(ScalarKind::String)
    }

    /// Every custom scalar name reachable from this type, in first-seen
    /// order.
    pub(crate) fn collect_custom_scalars(&self, names: &mut indexmap::IndexSet<String>) {
        match self {
            Self::CustomScalar { name, .. } => {
                names.insert(name.clone());
            },
            Self::List { of_type, .. } => of_type.collect_custom_scalars(names),
            Self::Object { shape, .. } => shape.collect_custom_scalars(names),
            Self::Scalar { .. } => (),
        }
    }

    /// Renders this type the way it would be written in a GraphQL document.
    /// Object types have no name in a compiled shape and render as
    /// `Object`.
    pub fn to_graphql_string(&self) -> String {
        let (inner, nullable) = match self {
            Self::CustomScalar { name, nullable } => (name.to_string(), *nullable),
            Self::List { of_type, nullable } => {
                (format!("[{}]", of_type.to_graphql_string()), *nullable)
            },
            Self::Object { nullable, .. } => ("Object".to_string(), *nullable),
            Self::Scalar { scalar, nullable } => (scalar.as_str().to_string(), *nullable),
        };
        if nullable {
            inner
        } else {
            format!("{inner}!")
        }
    }
}
