use std::any::Any;

/// A decoded custom scalar value, type-erased so that [`Value`](crate::Value)
/// can hold whatever an application's
/// [`ScalarAdapter`](crate::ScalarAdapter) produces.
///
/// Implemented for every `Debug + PartialEq + Send + Sync + 'static` type.
/// Use [`downcast_ref`](trait.CustomScalar.html#method.downcast_ref) to get
/// the concrete value back.
pub trait CustomScalar: std::fmt::Debug + Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;

    fn eq_dyn(&self, other: &dyn CustomScalar) -> bool;
}
impl<T> CustomScalar for T
where
    T: std::fmt::Debug + PartialEq + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_dyn(&self, other: &dyn CustomScalar) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}
impl dyn CustomScalar {
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}
