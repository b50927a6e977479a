//! Unit tests for block and publish validation.

use super::fixtures::{document_of, validator};
use crate::article::{
    domain::{
        Block, BlockDocument, BlockKind, DocumentOrigin, HeadingLevel, ImageBlock, MarkupError,
        Revision,
    },
    error::{BlockViolation, PublishPreconditionError, ValidationError},
    ports::validator::{BlockValidator, ValidationConfig, ValidationMode},
    validation::DefaultBlockValidator,
};
use rstest::rstest;

// ============================================================================
// Per-block validation
// ============================================================================

#[rstest]
#[case("")]
#[case("   ")]
#[case("\n\t")]
fn empty_heading_is_rejected(validator: DefaultBlockValidator, #[case] text: &str) {
    for mode in [ValidationMode::Authoring, ValidationMode::Publish] {
        assert_eq!(
            validator.validate(Block::heading(text, HeadingLevel::H2), mode),
            Err(ValidationError::EmptyText {
                field: "heading text"
            })
        );
    }
}

#[rstest]
fn empty_quote_is_rejected_but_attribution_is_optional(validator: DefaultBlockValidator) {
    assert_eq!(
        validator.validate(Block::quote(" ", "Someone"), ValidationMode::Authoring),
        Err(ValidationError::empty_text("quote text"))
    );
    let normalized = validator
        .validate(Block::quote(" Words ", ""), ValidationMode::Authoring)
        .expect("attribution may be empty");
    assert_eq!(normalized.block(), &Block::quote("Words", ""));
}

#[rstest]
#[case("<script>alert(1)</script>", MarkupError::DisallowedElement("script".to_owned()))]
#[case("<span>x</span>", MarkupError::DisallowedElement("span".to_owned()))]
#[case(
    "<em onclick=\"x()\">x</em>",
    MarkupError::DisallowedAttribute { element: "em".to_owned(), attribute: "onclick".to_owned() }
)]
#[case(
    "<a href=\"javascript:void(0)\">x</a>",
    MarkupError::UnsafeLink("javascript:void(0)".to_owned())
)]
fn paragraph_markup_outside_allow_list_is_rejected(
    validator: DefaultBlockValidator,
    #[case] markup: &str,
    #[case] expected: MarkupError,
) {
    assert_eq!(
        validator.validate(Block::paragraph(markup), ValidationMode::Authoring),
        Err(ValidationError::DisallowedMarkup(expected))
    );
}

#[rstest]
fn unbalanced_paragraph_markup_is_rejected(validator: DefaultBlockValidator) {
    let result = validator.validate(Block::paragraph("<b>open"), ValidationMode::Authoring);
    assert!(matches!(
        result,
        Err(ValidationError::DisallowedMarkup(MarkupError::Malformed(_)))
    ));
}

#[rstest]
fn incomplete_image_is_admitted_while_authoring(validator: DefaultBlockValidator) {
    let image = Block::Image(ImageBlock::new("").with_caption("Pending upload"));

    let normalized = validator
        .validate(image.clone(), ValidationMode::Authoring)
        .expect("incomplete image is admitted");
    assert!(normalized.has_advisory(crate::article::domain::ValidationAdvisory::IncompleteImage));

    assert_eq!(
        validator.validate(image, ValidationMode::Publish),
        Err(ValidationError::MissingUrl)
    );
}

#[rstest]
fn normalisation_is_idempotent(validator: DefaultBlockValidator) {
    let inputs = [
        Block::heading("  Title ", HeadingLevel::H4),
        Block::paragraph("<i>a</i><em>b</em> &amp; <b></b>c"),
        Block::quote(" q ", " a "),
        Block::Image(ImageBlock::new("/img.png").with_alt_text(" <b>alt</b> &amp; more ")),
        Block::Image(ImageBlock::new("/img.png").with_caption("Use &lt;b&gt; tags")),
    ];
    for input in inputs {
        let once = validator
            .validate(input, ValidationMode::Authoring)
            .expect("valid block");
        let twice = validator
            .validate(once.block().clone(), ValidationMode::Authoring)
            .expect("normalised block stays valid");
        assert_eq!(once, twice);
    }
}

#[test]
fn field_limits_come_from_config() {
    let validator = DefaultBlockValidator::with_config(ValidationConfig::strict());
    let long = "x".repeat(121);
    assert_eq!(
        validator.validate(Block::heading(long, HeadingLevel::H2), ValidationMode::Authoring),
        Err(ValidationError::TextTooLong {
            field: "heading text",
            max: 120,
            actual: 121
        })
    );
}

#[test]
fn config_presets_are_ordered() {
    let default = ValidationConfig::default();
    let lenient = ValidationConfig::lenient();
    let strict = ValidationConfig::strict();

    assert!(strict.max_blocks < default.max_blocks);
    assert!(default.max_blocks < lenient.max_blocks);
    assert!(strict.max_paragraph_length < default.max_paragraph_length);
    assert!(default.max_paragraph_length < lenient.max_paragraph_length);
}

// ============================================================================
// Publish validation
// ============================================================================

#[rstest]
fn incomplete_image_blocks_publication(validator: DefaultBlockValidator) {
    let document = document_of(
        &validator,
        vec![
            Block::heading("Gallery", HeadingLevel::H2),
            Block::image(""),
        ],
    );

    for normalized in document.snapshot() {
        assert!(
            validator
                .validate(normalized.block().clone(), ValidationMode::Authoring)
                .is_ok()
        );
    }
    assert_eq!(
        validator.validate_for_publish(&document),
        Err(PublishPreconditionError::OffendingBlocks(vec![
            BlockViolation {
                position: 1,
                kind: BlockKind::Image,
                error: ValidationError::MissingUrl,
            }
        ]))
    );
}

#[rstest]
fn every_offending_block_is_reported(validator: DefaultBlockValidator) {
    let document = document_of(
        &validator,
        vec![
            Block::image(""),
            Block::paragraph("Fine"),
            Block::image(""),
            Block::image("https://cdn.example.com/ok.jpg"),
            Block::image(""),
        ],
    );

    let error = validator
        .validate_for_publish(&document)
        .expect_err("three incomplete images");
    assert_eq!(error.offending_positions(), vec![0, 2, 4]);
}

#[rstest]
fn empty_document_is_not_publishable(validator: DefaultBlockValidator) {
    assert_eq!(
        validator.validate_for_publish(&BlockDocument::new()),
        Err(PublishPreconditionError::EmptyDocument)
    );
}

#[test]
fn block_limit_applies_at_publish() {
    let validator = DefaultBlockValidator::with_config(ValidationConfig {
        max_blocks: 2,
        ..ValidationConfig::default()
    });
    let document = document_of(
        &validator,
        vec![
            Block::paragraph("one"),
            Block::paragraph("two"),
            Block::paragraph("three"),
        ],
    );

    assert_eq!(
        validator.validate_document(&document),
        Err(ValidationError::TooManyBlocks { max: 2, actual: 3 })
    );
    assert_eq!(
        validator.validate_for_publish(&document),
        Err(PublishPreconditionError::Limits(
            ValidationError::TooManyBlocks { max: 2, actual: 3 }
        ))
    );
}

#[rstest]
fn migrated_document_requires_confirmation(validator: DefaultBlockValidator) {
    let authored = document_of(&validator, vec![Block::paragraph("Imported text")]);
    let mut migrated = BlockDocument::from_parts(
        authored.snapshot().to_vec(),
        Revision::INITIAL,
        DocumentOrigin::Migrated,
    );

    assert_eq!(
        validator.validate_for_publish(&migrated),
        Err(PublishPreconditionError::UnconfirmedMigration)
    );

    migrated.confirm_migration();
    assert_eq!(migrated.origin(), DocumentOrigin::MigrationConfirmed);
    assert_eq!(validator.validate_for_publish(&migrated), Ok(()));
}

#[rstest]
fn blank_paragraphs_do_not_block_publication(validator: DefaultBlockValidator) {
    let document = document_of(
        &validator,
        vec![Block::paragraph("Text"), Block::paragraph("<em> </em>")],
    );
    assert_eq!(validator.validate_for_publish(&document), Ok(()));
}
