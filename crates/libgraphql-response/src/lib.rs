//! Client-side GraphQL response decoding.
//!
//! An [`Operation`] pairs a name with the compiled shape of its root
//! selection set. Decoding drives a [`JsonReader`](libgraphql_json::JsonReader)
//! through that shape and produces a [`ResponseObject`] of typed [`Value`]s,
//! enforcing nullability and `@skip`/`@include` conditions along the way.
//! Encoding walks the same shape in declaration order to write a value back
//! out as JSON text or as a raw [`JsonValue`](libgraphql_json::JsonValue)
//! tree.
//!
//! Incremental delivery (`@defer` and `@stream`) is handled by
//! [`IncrementalMerger`], which accumulates patches into the raw tree and
//! re-decodes it after every payload. [`IncrementalResponseStream`] drives a
//! merger from a `multipart/mixed` byte stream.

mod codec_error;
mod composite_codec;
mod condition;
mod custom_scalar;
mod decode_context;
mod decode_options;
mod deferred_fragment;
mod field_descriptor;
mod field_type;
mod graphql_error;
mod graphql_response;
mod incremental_error;
mod incremental_merger;
mod incremental_payload;
mod incremental_response_stream;
mod multipart_decoder;
mod object_shape;
mod operation;
mod response_object;
mod scalar_adapter;
mod scalar_adapter_registry;
mod scalar_adapter_registry_builder;
mod scalar_coercion_error;
mod scalar_kind;
mod value;
mod value_codec;

pub use codec_error::CodecError;
pub use composite_codec::CompositeCodec;
pub use condition::Condition;
pub use custom_scalar::CustomScalar;
pub use decode_context::DecodeContext;
pub use decode_context::DeferMode;
pub use decode_context::DeliveredFragment;
pub use decode_options::DecodeOptions;
pub use deferred_fragment::DeferredFragment;
pub use field_descriptor::FieldDescriptor;
pub use field_type::FieldType;
pub use graphql_error::GraphQLError;
pub use graphql_error::GraphQLErrorLocation;
pub use graphql_response::GraphQLResponse;
pub use incremental_error::IncrementalError;
pub use incremental_merger::IncrementalMerger;
pub use incremental_merger::MergerState;
pub use incremental_payload::IncrementalEntry;
pub use incremental_payload::IncrementalPayload;
pub use incremental_response_stream::IncrementalResponseStream;
pub use multipart_decoder::MultipartDecoder;
pub use object_shape::ObjectShape;
pub use operation::Operation;
pub use response_object::ResponseObject;
pub use scalar_adapter::FnScalarAdapter;
pub use scalar_adapter::JsonValueAdapter;
pub use scalar_adapter::LongScalarAdapter;
pub use scalar_adapter::ScalarAdapter;
pub use scalar_adapter::StringScalarAdapter;
pub use scalar_adapter_registry::ScalarAdapterRegistry;
pub use scalar_adapter_registry_builder::ScalarAdapterRegistryBuildError;
pub use scalar_adapter_registry_builder::ScalarAdapterRegistryBuilder;
pub use scalar_coercion_error::ScalarCoercionError;
pub use scalar_kind::ScalarKind;
pub use value::Value;
pub use value_codec::ValueCodec;

/// The member every GraphQL object may carry to name its concrete type.
pub const TYPENAME_FIELD: &str = "__typename";

pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests;
