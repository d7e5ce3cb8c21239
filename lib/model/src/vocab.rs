//! Vocabularies used by the OSF web services.

pub use oxrdf::vocab::{rdf, xsd};

pub mod void {
    //! [VoID](http://rdfs.org/ns/void#) vocabulary.
    use oxrdf::NamedNodeRef;

    pub const DATASET: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#Dataset");
}

pub mod dcterms {
    //! [DCMI Metadata Terms](http://purl.org/dc/terms/).
    use oxrdf::NamedNodeRef;

    pub const TITLE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/title");
    pub const DESCRIPTION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/description");
    pub const CREATOR: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/creator");
    pub const CREATED: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/created");
}

pub mod sioc {
    //! [SIOC](http://rdfs.org/sioc/ns#) vocabulary.
    use oxrdf::NamedNodeRef;

    pub const MEMBER_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/sioc/ns#member_of");
}

pub mod wsf {
    //! The web services framework vocabulary. Describes errors and the internal graphs.
    use oxrdf::NamedNodeRef;

    pub const NAMESPACE: &str = "http://purl.org/ontology/wsf#";

    pub const ERROR: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/ontology/wsf#Error");
    pub const ID: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/ontology/wsf#id");
    pub const WEBSERVICE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/ontology/wsf#webservice");
    pub const NAME: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/ontology/wsf#name");
    pub const DESCRIPTION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/ontology/wsf#description");
    pub const DEBUG_INFO: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/ontology/wsf#debugInfo");
    pub const LEVEL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/ontology/wsf#level");

    pub const DATASETS_GRAPH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/ontology/wsf#DatasetsGraph");
    pub const AUTH_GRAPH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/ontology/wsf#AuthGraph");
}
