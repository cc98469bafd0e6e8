//! Schema fixtures shared by the integration tests

use autowrap_schema::{
    FieldDescription, FixedPrecisionConverter, HelperKind, MethodDescription, ScalarType, Schema,
    TypeDescription,
};

pub const APML_NS: &str = "http://www.apml.org/apml-0.6";

macro_rules! schema {
    ($name:ident => $body:expr) => {
        #[derive(Debug)]
        pub struct $name;

        impl Schema for $name {
            fn describe() -> TypeDescription {
                $body
            }
        }
    };
}

// Properties

schema!(Empty => TypeDescription::new());

schema!(PropertyWithoutTag => TypeDescription::new().field(FieldDescription::string("Key")));

schema!(SingleProperty => TypeDescription::new().field(FieldDescription::string("Key").attribute()));

schema!(SinglePropertyWithDefault => TypeDescription::new()
    .field(FieldDescription::integer("Key").attribute().default_value(12)));

schema!(PropertyWithAlternateName => TypeDescription::new()
    .field(FieldDescription::string("Key").attribute_named("Key2")));

schema!(Elements => TypeDescription::new()
    .field(FieldDescription::string("Content").element())
    .field(FieldDescription::string("ContentB").element().default_value("my-default"))
    .field(FieldDescription::string("ContentC").element_named("ContentC2")));

schema!(Flags => TypeDescription::new()
    .field(FieldDescription::boolean("Enabled").attribute().default_value(false))
    .field(FieldDescription::float("Ratio").element()));

schema!(WithComplexElement => TypeDescription::new()
    .field(FieldDescription::schema::<SingleProperty>("Child").element()));

schema!(WithSettableComplexElement => TypeDescription::new()
    .field(FieldDescription::schema::<SingleProperty>("Child").element().settable()));

schema!(WithSettableSequence => TypeDescription::new()
    .field(FieldDescription::list::<SingleProperty>("Child").element().settable()));

schema!(InheritedInterface => TypeDescription::new().extends::<WithComplexElement>());

schema!(WithElementSequenceAsArray => TypeDescription::new()
    .field(FieldDescription::array::<SingleProperty>("Child").element()));

schema!(WithElementSequenceAsList => TypeDescription::new()
    .field(FieldDescription::list::<SingleProperty>("Child").element()));

schema!(WithElementSequenceAsDictionary => TypeDescription::new()
    .field(FieldDescription::dict::<SingleProperty>("Child").element().key("Key")));

schema!(WithElementContainerAsArray => TypeDescription::new()
    .field(FieldDescription::array::<SingleProperty>("Child").container("Children")));

schema!(WithElementContainerAsList => TypeDescription::new()
    .field(FieldDescription::list::<SingleProperty>("Child").container("Children"))
    .method(MethodDescription::new("InitChildren"))
    .method(MethodDescription::new("ClearChild")));

schema!(WithElementContainerAsDictionary => TypeDescription::new()
    .field(FieldDescription::dict::<SingleProperty>("Child").container("Children").key("Key")));

schema!(WithElementContainerAsDictionaryOfLists => TypeDescription::new()
    .field(
        FieldDescription::dict_of_lists::<SingleProperty>("Child")
            .container("Children")
            .key("Key"),
    )
    .method(MethodDescription::new("AddChild").param("key", ScalarType::String)));

schema!(WithConverterAndDefault => TypeDescription::new()
    .field(
        FieldDescription::float("Value")
            .attribute()
            .converter(FixedPrecisionConverter::two_places())
            .default_value(1.0),
    ));

schema!(WithMismatchedConverter => TypeDescription::new()
    .field(
        FieldDescription::string("Value")
            .attribute()
            .converter(FixedPrecisionConverter::two_places()),
    ));

schema!(WithMistypedDefault => TypeDescription::new()
    .field(FieldDescription::integer("Key").attribute().default_value("twelve")));

// Methods

schema!(SingleElementWithInitMethod => TypeDescription::new()
    .field(FieldDescription::schema::<SingleProperty>("Single").element())
    .method(MethodDescription::new("InitSingle").param("key", ScalarType::String)));

schema!(SingleElementWithClearMethod => TypeDescription::new()
    .field(FieldDescription::schema::<SingleProperty>("Single").element())
    .method(MethodDescription::new("ClearSingle")));

schema!(ArrayElementWithAddMethod => TypeDescription::new()
    .field(FieldDescription::array::<SingleProperty>("Single").element())
    .method(
        MethodDescription::new("AddSingle")
            .param("key", ScalarType::String)
            .returns::<SingleProperty>(),
    ));

schema!(ListElementWithAddMethod => TypeDescription::new()
    .field(FieldDescription::list::<SingleProperty>("Single").element())
    .method(
        MethodDescription::new("AddSingle")
            .param("key", ScalarType::String)
            .returns::<SingleProperty>(),
    )
    .method(MethodDescription::new("ClearSingle")));

schema!(DoubleProperty => TypeDescription::new()
    .field(FieldDescription::string("Key").attribute())
    .field(FieldDescription::float("Value").attribute().default_value(1.0)));

schema!(InheritsDoubleProperty => TypeDescription::new().extends::<DoubleProperty>());

schema!(DictionaryElementWithAddMethod => TypeDescription::new()
    .field(FieldDescription::dict::<DoubleProperty>("Double").element().key("Key"))
    .method(
        MethodDescription::new("AddDouble")
            .param("key", ScalarType::String)
            .param("value", ScalarType::Float)
            .returns::<DoubleProperty>(),
    ));

schema!(DictionaryElementWithAddMethodAndInherited => TypeDescription::new()
    .field(FieldDescription::dict::<InheritsDoubleProperty>("Double").element().key("Key"))
    .method(
        MethodDescription::new("AddDouble")
            .param("key", ScalarType::String)
            .param("value", ScalarType::Float)
            .returns::<InheritsDoubleProperty>(),
    ));

schema!(ExplicitHelpers => TypeDescription::new()
    .field(FieldDescription::list::<SingleProperty>("Entries").element_named("Entry"))
    .method(
        MethodDescription::new("Append")
            .param("key", ScalarType::String)
            .helper_for(HelperKind::Add, "Entries"),
    )
    .method(MethodDescription::new("Reset").helper_for(HelperKind::Clear, "Entries")));

// APML-shaped document

schema!(ApmlDocument => TypeDescription::new()
    .field(
        FieldDescription::string("Version")
            .attribute_named("version")
            .default_value("0.6")
            .auto_init(),
    )
    .field(FieldDescription::schema::<Head>("Head").element_ns(APML_NS).auto_init())
    .field(FieldDescription::schema::<Body>("Body").element_ns(APML_NS).auto_init()));

schema!(Head => TypeDescription::new()
    .field(FieldDescription::string("Title").element_ns(APML_NS).auto_init())
    .field(FieldDescription::string("DateCreated").element_ns(APML_NS)));

schema!(Body => TypeDescription::new()
    .field(FieldDescription::string("DefaultProfile").attribute_named("defaultprofile"))
    .field(
        FieldDescription::dict::<Profile>("Profiles")
            .element_named_ns("Profile", APML_NS)
            .key("Name"),
    )
    .method(
        MethodDescription::new("AddProfile")
            .param("name", ScalarType::String)
            .returns::<Profile>(),
    ));

schema!(Profile => TypeDescription::new()
    .field(FieldDescription::string("Name").attribute_named("name"))
    .field(
        FieldDescription::schema::<ImplicitData>("ImplicitData")
            .element_ns(APML_NS)
            .auto_init(),
    )
    .field(
        FieldDescription::list::<Profile>("Profiles")
            .element_named_ns("Profile", APML_NS),
    )
    .method(
        MethodDescription::new("AddProfile")
            .param("name", ScalarType::String)
            .returns::<Profile>(),
    ));

schema!(ImplicitData => TypeDescription::new()
    .field(
        FieldDescription::dict::<Concept>("Concepts")
            .container_ns("Concepts", APML_NS)
            .item_named("Concept")
            .key("Key"),
    )
    .method(
        MethodDescription::new("AddConcept")
            .param("key", ScalarType::String)
            .param("value", ScalarType::Float)
            .returns::<Concept>(),
    )
    .method(MethodDescription::new("InitConcepts")));

schema!(Concept => TypeDescription::new()
    .field(FieldDescription::string("Key").attribute_named("key"))
    .field(
        FieldDescription::float("Value")
            .attribute_named("value")
            .converter(FixedPrecisionConverter::two_places()),
    )
    .field(FieldDescription::string("From").attribute_named("from")));

// Alternate read-only view over a concept node
schema!(ConceptSummary => TypeDescription::new()
    .field(FieldDescription::string("Key").attribute_named("key").read_only()));
