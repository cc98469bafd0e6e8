//! Scalar, child and sequence accessors over existing documents

use autowrap_core::{SequenceValue, SharedDocument, WrapperError, WrapperGenerator};
use autowrap_dom::NodeId;
use autowrap_schema::Value;
use autowrap_strategy::StrategyError;
use autowrap_test_utils::fixtures::{
    Concept, ConceptSummary, Elements, Flags, InheritedInterface, PropertyWithAlternateName,
    PropertyWithoutTag, SingleProperty, SinglePropertyWithDefault, WithComplexElement,
    WithElementContainerAsArray, WithElementContainerAsDictionary,
    WithElementContainerAsDictionaryOfLists, WithElementContainerAsList,
    WithElementSequenceAsArray, WithElementSequenceAsDictionary, WithElementSequenceAsList,
    WithMismatchedConverter, WithSettableComplexElement,
};
use autowrap_test_utils::{
    append_keyed, create_document, create_single, create_with_children,
    create_with_contained_children, create_with_element_text, init_tracing,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn shared(parts: (autowrap_dom::Document, NodeId)) -> (SharedDocument, NodeId) {
    let (doc, root) = parts;
    (SharedDocument::from_document(doc), root)
}

fn keys(items: &[autowrap_core::Wrapper]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.get_as::<String>("Key").unwrap().unwrap_or_default())
        .collect()
}

// Attributes

#[test]
fn reads_attribute() {
    init_tracing();
    let (doc, root) = shared(create_single("Blah"));
    let single = WrapperGenerator::new().wrap::<SingleProperty>(&doc, root).unwrap();

    assert_eq!(single.get_as::<String>("Key").unwrap().as_deref(), Some("Blah"));
    assert!(single.is_cached("Key").unwrap());
}

#[test]
fn write_then_read_comes_from_cache() {
    let (doc, root) = shared(create_single("Blah"));
    let single = WrapperGenerator::new().wrap::<SingleProperty>(&doc, root).unwrap();

    single.set("Key", "Hello").unwrap();
    assert_eq!(doc.to_xml(), r#"<Single Key="Hello"/>"#);

    // Behind the wrapper's back; the cached value is still served
    doc.dom().set_attribute(root, "Key", "Other").unwrap();
    assert_eq!(single.get_as::<String>("Key").unwrap().as_deref(), Some("Hello"));
}

#[test]
fn alternate_attribute_name() {
    let (dom, root) = create_document("Single");
    dom.set_attribute(root, "Key2", "Blah").unwrap();
    let (doc, root) = shared((dom, root));
    let single = WrapperGenerator::new()
        .wrap::<PropertyWithAlternateName>(&doc, root)
        .unwrap();

    assert_eq!(single.get_as::<String>("Key").unwrap().as_deref(), Some("Blah"));
    single.set("Key", "Hello").unwrap();
    assert_eq!(doc.to_xml(), r#"<Single Key2="Hello"/>"#);
}

#[test]
fn default_is_not_written() {
    let (doc, root) = shared(create_document("Single"));
    let single = WrapperGenerator::new()
        .wrap::<SinglePropertyWithDefault>(&doc, root)
        .unwrap();

    assert_eq!(single.get_as::<i64>("Key").unwrap(), Some(12));
    assert_eq!(doc.to_xml(), "<Single/>");
}

#[test]
fn missing_attribute_without_default_is_none() {
    let (doc, root) = shared(create_document("Single"));
    let single = WrapperGenerator::new().wrap::<SingleProperty>(&doc, root).unwrap();

    assert_eq!(single.get("Key").unwrap(), None);
    assert!(single.is_cached("Key").unwrap());
}

#[test]
fn typed_attributes() {
    let (dom, root) = create_document("Flags");
    dom.set_attribute(root, "Enabled", "1").unwrap();
    let (doc, root) = shared((dom, root));
    let flags = WrapperGenerator::new().wrap::<Flags>(&doc, root).unwrap();

    assert_eq!(flags.get_as::<bool>("Enabled").unwrap(), Some(true));
    flags.set("Enabled", false).unwrap();
    assert_eq!(doc.to_xml(), r#"<Flags Enabled="false"/>"#);

    let err = flags.set("Enabled", "yes").unwrap_err();
    assert!(matches!(err, WrapperError::Convert(_)));
}

#[test]
fn unparseable_attribute_is_an_error() {
    let (dom, root) = create_document("Single");
    dom.set_attribute(root, "Key", "twelve").unwrap();
    let (doc, root) = shared((dom, root));
    let single = WrapperGenerator::new()
        .wrap::<SinglePropertyWithDefault>(&doc, root)
        .unwrap();

    assert!(matches!(single.get("Key").unwrap_err(), WrapperError::Convert(_)));
}

// Elements

#[test]
fn reads_element_text() {
    let (doc, root) = shared(create_with_element_text("Elements", "Content", "hello"));
    let elements = WrapperGenerator::new().wrap::<Elements>(&doc, root).unwrap();

    assert_eq!(elements.get_as::<String>("Content").unwrap().as_deref(), Some("hello"));
    assert_eq!(
        elements.get_as::<String>("ContentB").unwrap().as_deref(),
        Some("my-default")
    );
    assert_eq!(elements.get("ContentC").unwrap(), None);
}

#[test]
fn alternate_element_name() {
    let (doc, root) = shared(create_with_element_text("Elements", "ContentC2", "c"));
    let elements = WrapperGenerator::new().wrap::<Elements>(&doc, root).unwrap();

    assert_eq!(elements.get_as::<String>("ContentC").unwrap().as_deref(), Some("c"));
    elements.set("ContentC", "d").unwrap();
    assert_eq!(doc.to_xml(), "<Elements><ContentC2>d</ContentC2></Elements>");
}

#[test]
fn element_write_creates_element() {
    let (doc, root) = shared(create_document("Elements"));
    let elements = WrapperGenerator::new().wrap::<Elements>(&doc, root).unwrap();

    elements.set("Content", "hi").unwrap();
    assert_eq!(doc.to_xml(), "<Elements><Content>hi</Content></Elements>");
}

#[test]
fn empty_numeric_element_is_absent() {
    let (doc, root) = shared(create_with_element_text("Flags", "Ratio", ""));
    let flags = WrapperGenerator::new().wrap::<Flags>(&doc, root).unwrap();
    assert_eq!(flags.get("Ratio").unwrap(), None);

    let (doc, root) = shared(create_with_element_text("Flags", "Ratio", "0.5"));
    let flags = WrapperGenerator::new().wrap::<Flags>(&doc, root).unwrap();
    assert_eq!(flags.get_as::<f64>("Ratio").unwrap(), Some(0.5));
}

// Nested objects

#[test]
fn complex_child() {
    let (dom, root) = create_document("Root");
    append_keyed(&dom, root, "Child", &["a"]);
    let (doc, root) = shared((dom, root));
    let parent = WrapperGenerator::new().wrap::<WithComplexElement>(&doc, root).unwrap();

    let child = parent.child("Child").unwrap().unwrap();
    assert_eq!(child.get_as::<String>("Key").unwrap().as_deref(), Some("a"));

    let again = parent.child("Child").unwrap().unwrap();
    assert!(again.same_node(&child));
}

#[test]
fn missing_child_is_none() {
    let (doc, root) = shared(create_document("Root"));
    let parent = WrapperGenerator::new().wrap::<WithComplexElement>(&doc, root).unwrap();

    assert!(parent.child("Child").unwrap().is_none());
    assert_eq!(doc.to_xml(), "<Root/>");
}

#[test]
fn inherited_fields() {
    let (dom, root) = create_document("Root");
    append_keyed(&dom, root, "Child", &["a"]);
    let (doc, root) = shared((dom, root));
    let parent = WrapperGenerator::new().wrap::<InheritedInterface>(&doc, root).unwrap();

    let child = parent.child("Child").unwrap().unwrap();
    assert_eq!(child.get_as::<String>("Key").unwrap().as_deref(), Some("a"));
}

#[test]
fn accessor_kind_mismatch() {
    let (doc, root) = shared(create_document("Root"));
    let parent = WrapperGenerator::new().wrap::<WithComplexElement>(&doc, root).unwrap();

    assert!(matches!(
        parent.get("Child").unwrap_err(),
        WrapperError::WrongBinding { .. }
    ));
    assert!(matches!(
        parent.get("Nope").unwrap_err(),
        WrapperError::UnknownField { .. }
    ));
}

// Sequences

#[test]
fn self_delimited_shapes() {
    let generator = WrapperGenerator::new();

    let (doc, root) = shared(create_with_children(&["a", "b"]));
    let array = generator
        .wrap::<WithElementSequenceAsArray>(&doc, root)
        .unwrap()
        .array("Child")
        .unwrap();
    assert_eq!(keys(&array), vec!["a", "b"]);

    let list = generator
        .wrap::<WithElementSequenceAsList>(&doc, root)
        .unwrap()
        .list("Child")
        .unwrap();
    assert_eq!(keys(&list.read()), vec!["a", "b"]);

    let dict = generator
        .wrap::<WithElementSequenceAsDictionary>(&doc, root)
        .unwrap()
        .dict("Child")
        .unwrap();
    let dict = dict.read();
    assert_eq!(dict.keys().cloned().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(dict["b"].get_as::<String>("Key").unwrap().as_deref(), Some("b"));
}

#[test]
fn contained_shapes() {
    let generator = WrapperGenerator::new();
    let (doc, root) = shared(create_with_contained_children(&["a", "b", "a"]));

    let array = generator
        .wrap::<WithElementContainerAsArray>(&doc, root)
        .unwrap()
        .array("Child")
        .unwrap();
    assert_eq!(array.len(), 3);

    let list = generator
        .wrap::<WithElementContainerAsList>(&doc, root)
        .unwrap()
        .list("Child")
        .unwrap();
    assert_eq!(list.read().len(), 3);

    let dict = generator
        .wrap::<WithElementContainerAsDictionary>(&doc, root)
        .unwrap()
        .dict("Child")
        .unwrap();
    assert_eq!(dict.read().len(), 2);

    let groups = generator
        .wrap::<WithElementContainerAsDictionaryOfLists>(&doc, root)
        .unwrap()
        .dict_of_lists("Child")
        .unwrap();
    let groups = groups.read();
    assert_eq!(groups["a"].len(), 2);
    assert_eq!(groups["b"].len(), 1);
}

#[test]
fn duplicate_dictionary_key_keeps_first() {
    let (doc, root) = shared(create_with_children(&["a", "a"]));
    let parent = WrapperGenerator::new()
        .wrap::<WithElementSequenceAsDictionary>(&doc, root)
        .unwrap();
    let nodes = doc.dom().child_elements(root).unwrap();

    let dict = parent.dict("Child").unwrap();
    let dict = dict.read();
    assert_eq!(dict.len(), 1);
    assert_eq!(dict["a"].node(), nodes[0]);
}

#[test]
fn missing_container_is_empty() {
    let (doc, root) = shared(create_document("Single"));
    let parent = WrapperGenerator::new()
        .wrap::<WithElementContainerAsList>(&doc, root)
        .unwrap();

    let seq = parent.sequence("Child").unwrap();
    assert!(seq.is_empty());
    assert!(matches!(seq, SequenceValue::List(_)));
    assert_eq!(doc.to_xml(), "<Single/>");
}

#[test]
fn sequence_shape_mismatch() {
    let (doc, root) = shared(create_with_children(&["a"]));
    let parent = WrapperGenerator::new()
        .wrap::<WithElementSequenceAsList>(&doc, root)
        .unwrap();

    assert!(matches!(
        parent.array("Child").unwrap_err(),
        WrapperError::WrongBinding { .. }
    ));
}

// Configuration errors

#[test]
fn configuration_errors_surface_at_wrap() {
    let (doc, root) = shared(create_document("Single"));
    let generator = WrapperGenerator::new();

    let err = generator.wrap::<PropertyWithoutTag>(&doc, root).unwrap_err();
    assert!(err.is_configuration());

    let err = generator.wrap::<WithSettableComplexElement>(&doc, root).unwrap_err();
    assert!(matches!(
        err,
        WrapperError::Strategy(StrategyError::SetterOnComplexElement { .. })
    ));

    let err = generator.wrap::<WithMismatchedConverter>(&doc, root).unwrap_err();
    assert!(matches!(
        err,
        WrapperError::Strategy(StrategyError::ConverterTypeMismatch { .. })
    ));
}

// Converters and alternate views

#[test]
fn converter_formats_dom_text() {
    let (doc, root) = shared(create_document("Concept"));
    let generator = WrapperGenerator::new();
    let concept = generator.wrap::<Concept>(&doc, root).unwrap();

    concept.set("Value", 0.8123).unwrap();
    assert_eq!(concept.get_as::<f64>("Value").unwrap(), Some(0.8123));
    assert_eq!(doc.to_xml(), r#"<Concept value="0.81"/>"#);

    let fresh = generator.wrap::<Concept>(&doc, root).unwrap();
    assert_eq!(fresh.get_as::<f64>("Value").unwrap(), Some(0.81));
}

#[test]
fn as_type_views_same_node() {
    let (dom, root) = create_document("Concept");
    dom.set_attribute(root, "key", "rust").unwrap();
    let (doc, root) = shared((dom, root));
    let concept = WrapperGenerator::new().wrap::<Concept>(&doc, root).unwrap();

    let summary = concept.as_type::<ConceptSummary>().unwrap();
    assert!(summary.same_node(&concept));
    assert_eq!(summary.get_as::<String>("Key").unwrap().as_deref(), Some("rust"));
    assert!(matches!(
        summary.set("Key", "go").unwrap_err(),
        WrapperError::NotWritable { .. }
    ));
}

#[test]
fn instances_do_not_share_caches() {
    let (doc, root) = shared(create_single("Blah"));
    let generator = WrapperGenerator::new();
    let first = generator.wrap::<SingleProperty>(&doc, root).unwrap();
    let second = generator.wrap::<SingleProperty>(&doc, root).unwrap();

    assert_eq!(second.get_as::<String>("Key").unwrap().as_deref(), Some("Blah"));
    first.set("Key", "New").unwrap();

    assert_eq!(second.get_as::<String>("Key").unwrap().as_deref(), Some("Blah"));
    let third = generator.wrap::<SingleProperty>(&doc, root).unwrap();
    assert_eq!(third.get_as::<String>("Key").unwrap().as_deref(), Some("New"));
}

#[test]
fn clones_share_caches() {
    let (doc, root) = shared(create_single("Blah"));
    let single = WrapperGenerator::new().wrap::<SingleProperty>(&doc, root).unwrap();
    let clone = single.clone();

    clone.set("Key", Value::from("Hello")).unwrap();
    assert!(single.is_cached("Key").unwrap());
    assert_eq!(single.get_as::<String>("Key").unwrap().as_deref(), Some("Hello"));
}

proptest! {
    #[test]
    fn prop_attribute_text_survives_rewrap(key in "[a-zA-Z0-9 _.-]{0,16}") {
        let (doc, root) = shared(create_document("Single"));
        let generator = WrapperGenerator::new();

        generator.wrap::<SingleProperty>(&doc, root).unwrap().set("Key", key.as_str()).unwrap();
        let fresh = generator.wrap::<SingleProperty>(&doc, root).unwrap();
        prop_assert_eq!(fresh.get_as::<String>("Key").unwrap(), Some(key));
    }

    #[test]
    fn prop_integer_attribute_roundtrip(value in any::<i64>()) {
        let (doc, root) = shared(create_document("Single"));
        let generator = WrapperGenerator::new();

        generator.wrap::<SinglePropertyWithDefault>(&doc, root).unwrap().set("Key", value).unwrap();
        let fresh = generator.wrap::<SinglePropertyWithDefault>(&doc, root).unwrap();
        prop_assert_eq!(fresh.get_as::<i64>("Key").unwrap(), Some(value));
    }
}
