// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Schema vocabularies attached through the triple store.
//!
//! Two vocabulary generations exist side by side and overlap in role. The
//! `will://…/3.0/` namespaces and the `uim://math/` namespace are the older
//! generation; the WODL-style `will:seg/0.3` and `will:ner/0.1` classes are
//! the newer one. Recognition backends emit either, so both are carried
//! verbatim — they are sibling vocabularies, not candidates for unification.

/// RDF predicates shared by both generations.
pub mod rdf {
    /// Type predicate per RDF 1.1 XML syntax.
    pub const HAS_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// Locale as defined in the Open Graph Protocol.
    pub const LOCALE: &str = "http://ogp.me/ns#locale";
    /// Class-tag shorthand predicate.
    pub const IS: &str = "@";
}

/// Older generation: `will://semantic/3.0/` predicates.
pub mod sem_30 {
    /// Namespace prefix.
    pub const NS: &str = "will://semantic/3.0/";
    /// `is` predicate.
    pub const IS: &str = "will://semantic/3.0/is";
    /// Alternative content.
    pub const HAS_ALT: &str = "will://semantic/3.0/hasAlt";
    /// Document category.
    pub const HAS_CATEGORY: &str = "will://semantic/3.0/hasCategory";
    /// Entity URI.
    pub const HAS_URI: &str = "will://semantic/3.0/hasUri";
    /// Entity type.
    pub const HAS_TYPE: &str = "will://semantic/3.0/hasType";
    /// Relevant concept.
    pub const HAS_RELEVANT_CONCEPT: &str = "will://semantic/3.0/hasRelevantConcept";
    /// Article text.
    pub const HAS_ARTICLE: &str = "will://semantic/3.0/hasArticle";
    /// Image URL.
    pub const HAS_IMAGE: &str = "will://semantic/3.0/hasImage";
    /// Thumbnail URL.
    pub const HAS_THUMB: &str = "will://semantic/3.0/hasThumb";
    /// Label.
    pub const HAS_LABEL: &str = "will://semantic/3.0/hasLabel";
    /// Abstract text.
    pub const HAS_ABSTRACT: &str = "will://semantic/3.0/hasAbstract";
    /// Source.
    pub const HAS_SOURCE: &str = "will://semantic/3.0/hasSource";
    /// Confidence score.
    pub const HAS_CONFIDENCE: &str = "will://semantic/3.0/hasConfidence";
    /// Named-entity definition.
    pub const HAS_NAMED_ENTITY: &str = "will://semantic/3.0/hasNamedEntityDefinition";
    /// Topic entity.
    pub const HAS_TOPIC_ENTITY: &str = "will://semantic/3.0/hasTopicEntity";
}

/// Older generation: `will://segmentation/3.0/` region classes.
pub mod seg_30 {
    /// Namespace prefix.
    pub const NS: &str = "will://segmentation/3.0/";
    /// Text region.
    pub const TEXT_REGION: &str = "will://segmentation/3.0/TextRegion";
    /// Text line.
    pub const TEXT_LINE: &str = "will://segmentation/3.0/TextLine";
    /// Word.
    pub const WORD: &str = "will://segmentation/3.0/Word";
    /// Paragraph.
    pub const PARAGRAPH: &str = "will://segmentation/3.0/Paragraph";
    /// Sentence.
    pub const SENTENCE: &str = "will://segmentation/3.0/Sentence";
    /// Punctuation.
    pub const PUNCTUATION: &str = "will://segmentation/3.0/Punctuation";
    /// Phrase.
    pub const PHRASE: &str = "will://segmentation/3.0/Phrase";
    /// Math block (older generation form).
    pub const MATH_BLOCK: &str = "will://segmentation/3.0/MathBlock";
}

/// Older generation: `uim://math/` structure classes.
///
/// Overlaps the `will://math/3.0/` attribute URIs below; both are kept.
pub mod math {
    /// Namespace prefix.
    pub const NS: &str = "uim://math/";
    /// Math content block.
    pub const MATH_BLOCK: &str = "uim://math/MathBlock";
    /// Expression.
    pub const EXPRESSION: &str = "uim://math/Expression";
    /// Group.
    pub const GROUP: &str = "uim://math/Group";
    /// Matrix.
    pub const MATRIX: &str = "uim://math/Matrix";
    /// Operand.
    pub const OPERAND: &str = "uim://math/Operand";
    /// Operator.
    pub const OPERATOR: &str = "uim://math/Operator";
    /// Symbol.
    pub const SYMBOL: &str = "uim://math/Symbol";
    /// Equality symbol.
    pub const EQUALS: &str = "uim://math/Equals";
    /// Fence.
    pub const FENCE: &str = "uim://math/Fence";
    /// Square root.
    pub const SQUARE_ROOT: &str = "uim://math/SquareRoot";
    /// Fraction.
    pub const FRACTION: &str = "uim://math/Fraction";
    /// Number.
    pub const NUMBER: &str = "uim://math/Number";
    /// Superscript.
    pub const SUPERSCRIPT: &str = "uim://math/SuperScript";
    /// Subscript.
    pub const SUBSCRIPT: &str = "uim://math/SubScript";
    /// LaTeX export attribute.
    pub const LATEX_EXPORT: &str = "uim://math/attr/hasLatexRepresentation";
    /// MathML export attribute.
    pub const MATHML_EXPORT: &str = "uim://math/attr/hasMathMLRepresentation";
    /// LaTeX representation attribute (`will://math/3.0/` sibling form).
    pub const LATEX_REPRESENTATION: &str = "will://math/3.0/attr/hasLatexRepresentation";
    /// MathML representation attribute (`will://math/3.0/` sibling form).
    pub const MATHML_REPRESENTATION: &str = "will://math/3.0/attr/hasMathMLRepresentation";
}

/// Newer generation: WODL content-segmentation classes (`will:seg/0.3`).
pub mod segmentation {
    /// Class prefix (schema version 0.3).
    pub const CLASS_PREFIX: &str = "will:seg/0.3/";
    /// Segmentation root.
    pub const ROOT: &str = "will:seg/0.3/Root";
    /// Text region.
    pub const TEXT_REGION: &str = "will:seg/0.3/TextRegion";
    /// Text line.
    pub const TEXT_LINE: &str = "will:seg/0.3/TextLine";
    /// Word of strokes.
    pub const WORD: &str = "will:seg/0.3/WordOfStrokes";
    /// Border.
    pub const BORDER: &str = "will:seg/0.3/Border";
    /// Connector.
    pub const CONNECTOR: &str = "will:seg/0.3/Connector";
    /// Correction.
    pub const CORRECTION: &str = "will:seg/0.3/Correction";
    /// Diagram.
    pub const DIAGRAM: &str = "will:seg/0.3/Diagram";
    /// Diagram connector.
    pub const DIAGRAM_CONNECTOR: &str = "will:seg/0.3/DiagramConnector";
    /// Drawing.
    pub const DRAWING: &str = "will:seg/0.3/Drawing";
    /// Drawing item group.
    pub const DRAWING_ITEM_GROUP: &str = "will:seg/0.3/DrawingItemGroup";
    /// Drawing item.
    pub const DRAWING_ITEM: &str = "will:seg/0.3/DrawingItem";
    /// Garbage.
    pub const GARBAGE: &str = "will:seg/0.3/Garbage";
    /// List.
    pub const LIST: &str = "will:seg/0.3/List";
    /// List item.
    pub const LIST_ITEM: &str = "will:seg/0.3/ListItem";
    /// Marking.
    pub const MARKING: &str = "will:seg/0.3/Marking";
    /// Marking-type predicate.
    pub const MARKING_TYPE_PREDICATE: &str = "markingType";
    /// Underlining marking type.
    pub const MARKING_TYPE_UNDERLINING: &str = "underlining";
    /// Encircling marking type.
    pub const MARKING_TYPE_ENCIRCLING: &str = "encircling";
    /// Math block (WODL form; overlaps `math::MATH_BLOCK`).
    pub const MATH_BLOCK: &str = "will:seg/0.3/MathBlock";
    /// Math item group.
    pub const MATH_ITEM_GROUP: &str = "will:seg/0.3/MathItemGroup";
    /// Math item.
    pub const MATH_ITEM: &str = "will:seg/0.3/MathItem";
    /// Table.
    pub const TABLE: &str = "will:seg/0.3/Table";
    /// Unlabelled.
    pub const UNLABELLED: &str = "will:seg/0.3/Unlabelled";
    /// Unlabelled block.
    pub const UNLABELLED_BLOCK: &str = "will:seg/0.3/UnlabelledBlock";
    /// Unlabelled item group.
    pub const UNLABELLED_ITEM_GROUP: &str = "will:seg/0.3/UnlabelledItemGroup";
    /// Unlabelled item.
    pub const UNLABELLED_ITEM: &str = "will:seg/0.3/UnlabelledItem";
    /// Content literal predicate.
    pub const HAS_CONTENT: &str = "hasContent";
    /// Language predicate.
    pub const HAS_LANGUAGE: &str = "hasLanguage";
    /// Alternative-content predicate.
    pub const HAS_ALTERNATIVE: &str = "hasAltContent";
    /// Membership in a named entity.
    pub const PART_OF_NAMED_ENTITY: &str = "isPartOfNamedEntity";
    /// Membership in a part-of-speech entity.
    pub const PART_OF_POS_ENTITY: &str = "isPartOfPOSEntity";
    /// View represented by a tree root.
    pub const REPRESENTS_VIEW: &str = "representsView";
    /// Producer of a view.
    pub const GENERATED_BY: &str = "generatedBy";
}

/// Newer generation: named-entity-recognition classes (`will:ner/0.1`).
pub mod ner {
    /// Class prefix (schema version 0.1).
    pub const CLASS_PREFIX: &str = "will:ner/0.1/";
    /// Named entity class.
    pub const NAMED_ENTITY: &str = "will:ner/0.1/NamedEntity";
    /// Named-entity reference predicate.
    pub const HAS_NAMED_ENTITY: &str = "hasNamedEntity";
    /// Article URL.
    pub const HAS_ARTICLE_URL: &str = "hasArticleUrl";
    /// Entity URI.
    pub const HAS_URI: &str = "hasURI";
    /// Source backend.
    pub const HAS_SOURCE: &str = "hasSource";
    /// Label.
    pub const HAS_LABEL: &str = "hasLabel";
    /// Abstract text.
    pub const HAS_ABSTRACT: &str = "hasAbstractText";
    /// Thumbnail URL.
    pub const HAS_THUMB: &str = "hasThumbnailUrl";
    /// Image URL.
    pub const HAS_IMAGE: &str = "hasImageUrl";
    /// Provider-declared ontology type.
    pub const HAS_ONTOLOGY_TYPE: &str = "hasProvidedOntologyType";
    /// Provider-declared entity type.
    pub const HAS_TYPE: &str = "hasProvidedEntityType";
    /// Confidence score.
    pub const HAS_CONFIDENCE: &str = "hasConfidence";
    /// Unique entity id (e.g. a Wikidata QID).
    pub const HAS_UNIQUE_ID: &str = "hasUniqueId";
    /// Provider name.
    pub const HAS_PROVIDER: &str = "hasProvider";
    /// Document category.
    pub const HAS_TOPIC_ENTITY: &str = "hasDocumentCategory";
    /// Creation date.
    pub const HAS_CREATION_DATE: &str = "hasCreationDate";
}

/// Document-level property URIs (`will://document/3.0/`).
pub mod document {
    /// Namespace prefix.
    pub const NS: &str = "will://document/3.0/";
    /// Title object.
    pub const TITLE: &str = "will://document/3.0/Title";
    /// Creation-date object.
    pub const CREATION_DATE: &str = "will://document/3.0/CreationData";
    /// Minimum X property.
    pub const X_MIN: &str = "will://document/3.0/hasMinX";
    /// Minimum Y property.
    pub const Y_MIN: &str = "will://document/3.0/hasMiny";
    /// Width property.
    pub const WIDTH: &str = "will://document/3.0/Width";
    /// Height property.
    pub const HEIGHT: &str = "will://document/3.0/Height";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generations_stay_distinct() {
        // Overlapping roles, different URIs; neither replaces the other.
        assert_ne!(seg_30::WORD, segmentation::WORD);
        assert_ne!(seg_30::MATH_BLOCK, math::MATH_BLOCK);
        assert_ne!(segmentation::MATH_BLOCK, math::MATH_BLOCK);
        assert_ne!(math::LATEX_EXPORT, math::LATEX_REPRESENTATION);
    }
}
