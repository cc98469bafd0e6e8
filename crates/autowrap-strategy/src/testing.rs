//! Test scope and schema fixtures

use crate::plan::TypeName;
use crate::strategy::GenerationScope;
use autowrap_schema::{
    FieldDescription, FixedPrecisionConverter, Introspector, MethodDescription, ScalarType, Schema,
    SchemaError, SchemaField, SchemaType, TypeDescription, TypeRef,
};
use std::sync::Arc;

#[derive(Default)]
pub(crate) struct RecordingScope {
    introspector: Introspector,
    pub(crate) required: Vec<TypeRef>,
}

impl GenerationScope for RecordingScope {
    fn require_type(&mut self, ty: &TypeRef) -> TypeName {
        if !self.required.contains(ty) {
            self.required.push(*ty);
        }
        TypeName::new(ty.short_name())
    }

    fn schema_of(&mut self, ty: &TypeRef) -> Result<Arc<SchemaType>, SchemaError> {
        self.introspector.introspect(ty)
    }
}

pub(crate) struct Entry;

impl Schema for Entry {
    fn describe() -> TypeDescription {
        TypeDescription::new()
            .field(FieldDescription::string("Key").attribute())
            .field(FieldDescription::float("Value").attribute().default_value(1.0))
    }
}

pub(crate) struct Holder;

impl Schema for Holder {
    fn describe() -> TypeDescription {
        TypeDescription::new()
            .field(FieldDescription::string("Name").attribute())
            .field(FieldDescription::integer("Count").element().default_value(12))
            .field(FieldDescription::schema::<Entry>("Single").element())
            .field(FieldDescription::array::<Entry>("Items").element_named("Item"))
            .field(FieldDescription::dict::<Entry>("Lookup").element().key("Key"))
            .field(
                FieldDescription::list::<Entry>("Children")
                    .container("Children")
                    .item_named("Child"),
            )
            .field(
                FieldDescription::float("Weight")
                    .attribute()
                    .converter(FixedPrecisionConverter::two_places()),
            )
            .field(FieldDescription::schema::<Entry>("Head").element().auto_init())
            .method(MethodDescription::new("AddItem").param("key", ScalarType::String))
            .method(
                MethodDescription::new("AddLookup")
                    .param("KEY", ScalarType::String)
                    .param("value", ScalarType::Float)
                    .returns::<Entry>(),
            )
            .method(MethodDescription::new("InitChildren"))
            .method(MethodDescription::new("InitSingle").param("key", ScalarType::String))
            .method(MethodDescription::new("ClearSingle"))
            .method(MethodDescription::new("ClearName"))
    }
}

pub(crate) fn holder() -> Arc<SchemaType> {
    Introspector::new()
        .introspect(&TypeRef::of::<Holder>())
        .unwrap()
}

pub(crate) fn field(schema: &SchemaType, name: &str) -> SchemaField {
    schema.field(name).unwrap().clone()
}
