//! Model metadata for the demo application.
//!
//! [`PERSON_MODEL`] describes a person record with one attribute per widget
//! the formset toolkit offers. Opinions are the related rows its relations
//! point to; they are a fixed list of sample rows.

use once_cell::sync::Lazy;

use formset_rs_forms::model::{ModelFieldDef, ModelFieldType, ModelMeta};

/// Number of sample opinions.
pub const OPINION_COUNT: usize = 25;

/// The sample opinion rows as `(primary key, label)` pairs.
pub static OPINIONS: Lazy<Vec<(String, String)>> = Lazy::new(|| {
    (1..=OPINION_COUNT)
        .map(|pk| (pk.to_string(), format!("Opinion {pk}")))
        .collect()
});

/// Label of the opinion model the person relations point to.
pub const OPINION_MODEL: &str = "testapp.OpinionModel";

/// The choices of the `gender` attribute.
pub const GENDER_CHOICES: &[(&str, &str)] = &[("female", "Female"), ("male", "Male")];

/// Metadata of `testapp.PersonModel`.
pub static PERSON_MODEL: Lazy<ModelMeta> = Lazy::new(|| {
    ModelMeta::new(
        "testapp",
        "PersonModel",
        vec![
            ModelFieldDef::new("id", ModelFieldType::AutoField).primary_key(),
            ModelFieldDef::new("full_name", ModelFieldType::CharField)
                .max_length(50)
                .verbose_name("full name"),
            ModelFieldDef::new(
                "avatar",
                ModelFieldType::FileField {
                    upload_to: "images".to_string(),
                },
            )
            .blank()
            .verbose_name("Avatar"),
            ModelFieldDef::new("gender", ModelFieldType::CharField)
                .max_length(6)
                .choices(GENDER_CHOICES.iter().copied())
                .verbose_name("Gender"),
            ModelFieldDef::new(
                "opinion",
                ModelFieldType::ForeignKey {
                    to: OPINION_MODEL.to_string(),
                },
            )
            .nullable()
            .blank()
            .choices(OPINIONS.iter().cloned())
            .verbose_name("Opinion"),
            ModelFieldDef::new(
                "opinions",
                ModelFieldType::ManyToManyField {
                    to: OPINION_MODEL.to_string(),
                    sortable: false,
                },
            )
            .choices(OPINIONS.iter().cloned())
            .verbose_name("Opinions"),
            ModelFieldDef::new(
                "weighted_opinions",
                ModelFieldType::ManyToManyField {
                    to: OPINION_MODEL.to_string(),
                    sortable: true,
                },
            )
            .choices(OPINIONS.iter().cloned())
            .verbose_name("Weighted opinions"),
        ],
    )
    .verbose_name("Person")
});
