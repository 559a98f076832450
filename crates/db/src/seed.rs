//! Demonstration dataset.
//!
//! Everything is created through the repositories, so the sample rows obey
//! the same rules as user data. Image bytes are small placeholders written
//! through the upload protocol.

use chrono::NaiveDate;
use mycotheca_core::error::CoreError;
use mycotheca_core::experiment::ExperimentStatus;
use mycotheca_core::types::{CalendarDate, DbId};
use mycotheca_core::uploads::{ContentStore, UploadBatch, UploadedFile};
use serde::Serialize;

use crate::error::StoreResult;
use crate::models::collection::{CreateCollection, UpdateCollection};
use crate::models::experiment::CreateExperiment;
use crate::models::isolate::CreateIsolate;
use crate::models::subculture::CreateSubculture;
use crate::repositories::{
    CollectionRepo, DashboardRepo, ExperimentRepo, IsolateRepo, SubcultureRepo,
};
use crate::DbPool;

/// Bytes written for each sample image.
const PLACEHOLDER_IMAGE: &[u8] = b"sample image placeholder";

/// Row counts created by [`load_sample_data`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub collections: usize,
    pub images: usize,
    pub isolates: usize,
    pub subcultures: usize,
    pub experiments: usize,
}

struct SampleCollection {
    code: &'static str,
    scientific_name: &'static str,
    common_name: &'static str,
    date: (i32, u32, u32),
    location: &'static str,
    coordinates: &'static str,
    substrate: &'static str,
    collector: &'static str,
    notes: &'static str,
    images: &'static [(&'static str, &'static str)],
}

const COLLECTIONS: &[SampleCollection] = &[
    SampleCollection {
        code: "COL001",
        scientific_name: "Agaricus bisporus",
        common_name: "Champignon",
        date: (2024, 3, 15),
        location: "Parque Nacional da Serra do Mar, SP",
        coordinates: "-23.5505, -46.6333",
        substrate: "solo",
        collector: "Dr. Silva",
        notes: "Found in Atlantic forest, next to decaying logs.",
        images: &[
            ("agaricus_bisporus_1.jpg", "Top view showing the brown cap"),
            ("agaricus_bisporus_2.jpg", "Side view showing the white gills"),
        ],
    },
    SampleCollection {
        code: "COL002",
        scientific_name: "Pleurotus ostreatus",
        common_name: "Shimeji",
        date: (2024, 3, 20),
        location: "Fazenda Experimental da UTFPR, PR",
        coordinates: "-25.4284, -49.2733",
        substrate: "madeira",
        collector: "Prof. Santos",
        notes: "Growing on a decaying eucalyptus trunk.",
        images: &[
            ("pleurotus_ostreatus_1.jpg", "Cluster growing on the trunk"),
            ("pleurotus_ostreatus_2.jpg", "Gill detail"),
            ("pleurotus_ostreatus_3.jpg", "Natural habitat"),
        ],
    },
    SampleCollection {
        code: "COL003",
        scientific_name: "Lentinula edodes",
        common_name: "Shiitake",
        date: (2024, 4, 5),
        location: "Mata Atlântica, Serra da Mantiqueira, MG",
        coordinates: "-22.9068, -45.4692",
        substrate: "tronco",
        collector: "Dra. Oliveira",
        notes: "Found on an oak trunk in advanced decay.",
        images: &[("lentinula_edodes_1.jpg", "Mature fruiting body with dark cap")],
    },
    SampleCollection {
        code: "COL004",
        scientific_name: "Ganoderma lucidum",
        common_name: "Reishi",
        date: (2024, 4, 12),
        location: "Parque Estadual do Rio Doce, MG",
        coordinates: "-19.9167, -42.6167",
        substrate: "raiz",
        collector: "Dr. Costa",
        notes: "Medicinal species found on roots of old trees.",
        images: &[
            ("ganoderma_lucidum_1.jpg", "Shell-shaped fruiting body"),
            ("ganoderma_lucidum_2.jpg", "Glossy upper surface"),
        ],
    },
    SampleCollection {
        code: "COL005",
        scientific_name: "Coprinus comatus",
        common_name: "Shaggy ink cap",
        date: (2024, 4, 18),
        location: "Campo de futebol da UTFPR, PR",
        coordinates: "-25.4284, -49.2733",
        substrate: "grama",
        collector: "Prof. Lima",
        notes: "Found on a lawn after heavy rain.",
        images: &[
            ("coprinus_comatus_1.jpg", "Young specimen with elongated white cap"),
            ("coprinus_comatus_2.jpg", "Deliquescence in progress"),
        ],
    },
];

/// (code, collection index, date, medium, temperature, notes)
const ISOLATES: &[(&str, usize, (i32, u32, u32), &str, f64, &str)] = &[
    ("ISO001", 0, (2024, 3, 16), "PDA", 25.0, "White mycelium, fast growth, colonised in 5 days."),
    ("ISO002", 1, (2024, 3, 21), "MEA", 28.0, "White to cream mycelium, colonised in 7 days."),
    ("ISO003", 2, (2024, 4, 6), "PDA", 26.0, "White mycelium, slow growth, colonised in 10 days."),
    ("ISO004", 3, (2024, 4, 13), "MEA", 30.0, "Light brown mycelium, colonised in 15 days."),
];

/// (isolate index, date, plates, medium, notes)
const SUBCULTURES: &[(usize, (i32, u32, u32), i32, &str, &str)] = &[
    (0, (2024, 3, 25), 5, "PDA", "First transfer, vigorous mycelium."),
    (0, (2024, 4, 10), 10, "PDA", "Second transfer, expanded to more plates."),
    (1, (2024, 3, 30), 3, "MEA", "First transfer, stable growth."),
    (2, (2024, 4, 20), 2, "PDA", "First transfer, slow but consistent."),
];

/// Load the demonstration dataset.
///
/// Refuses to run unless the store is empty, so it can never mix sample
/// rows into real data.
pub async fn load_sample_data(pool: &DbPool, store: &dyn ContentStore) -> StoreResult<SeedReport> {
    let stats = DashboardRepo::stats(pool).await?;
    if stats.total_collections + stats.total_isolates + stats.total_experiments > 0 {
        return Err(CoreError::Internal(
            "sample data can only be loaded into an empty store".into(),
        )
        .into());
    }

    let mut report = SeedReport::default();
    let mut collection_ids: Vec<DbId> = Vec::new();

    for sample in COLLECTIONS {
        let input = CreateCollection {
            code: sample.code.into(),
            scientific_name: Some(sample.scientific_name.into()),
            common_name: Some(sample.common_name.into()),
            collection_date: date(sample.date)?,
            location: Some(sample.location.into()),
            coordinates: Some(sample.coordinates.into()),
            substrate: Some(sample.substrate.into()),
            collector: Some(sample.collector.into()),
            notes: Some(sample.notes.into()),
        };
        let collection = CollectionRepo::create(pool, &input).await?;

        // One batch per image keeps each image's own description.
        for (filename, description) in sample.images {
            let batch = UploadBatch::new(
                vec![UploadedFile::new(*filename, PLACEHOLDER_IMAGE)],
                Some((*description).to_string()),
            );
            let (_, images) = CollectionRepo::update_with_images(
                pool,
                store,
                collection.id,
                &UpdateCollection::default(),
                &batch,
            )
            .await?;
            report.images += images.len();
        }

        collection_ids.push(collection.id);
        report.collections += 1;
    }

    let mut isolate_ids: Vec<DbId> = Vec::new();
    for (code, owner, isolated_on, medium, temperature, notes) in ISOLATES {
        let isolate = IsolateRepo::create(
            pool,
            &CreateIsolate {
                code: (*code).into(),
                collection_id: collection_ids[*owner],
                isolation_date: date(*isolated_on)?,
                culture_medium: Some((*medium).into()),
                incubation_temperature: Some(*temperature),
                notes: Some((*notes).into()),
            },
        )
        .await?;
        isolate_ids.push(isolate.id);
        report.isolates += 1;
    }

    for (owner, transferred_on, plates, medium, notes) in SUBCULTURES {
        SubcultureRepo::create(
            pool,
            &CreateSubculture {
                isolate_id: isolate_ids[*owner],
                subculture_date: date(*transferred_on)?,
                plate_count: Some(*plates),
                culture_medium: Some((*medium).into()),
                notes: Some((*notes).into()),
            },
        )
        .await?;
        report.subcultures += 1;
    }

    for input in experiments(&collection_ids, &isolate_ids)? {
        ExperimentRepo::create(pool, &input).await?;
        report.experiments += 1;
    }

    tracing::info!(?report, "Sample data loaded");
    Ok(report)
}

fn experiments(collections: &[DbId], isolates: &[DbId]) -> Result<Vec<CreateExperiment>, CoreError> {
    Ok(vec![
        CreateExperiment {
            title: "Pigment characterisation in Agaricus bisporus".into(),
            collection_id: Some(collections[0]),
            isolate_id: Some(isolates[0]),
            start_date: Some(date((2024, 4, 1))?),
            end_date: Some(date((2024, 5, 15))?),
            objective: Some("Identify and quantify pigments in mycelium and fruiting body.".into()),
            methods: Some("Solvent extraction, UV-Vis spectrophotometry, thin-layer chromatography.".into()),
            results: Some("Carotenoids and melanins identified; 2.3 mg/g dry weight in total.".into()),
            discussion: Some("Promising diversity of natural pigments.".into()),
            conclusions: Some("A promising source of natural pigments for food and cosmetics.".into()),
            status: ExperimentStatus::Concluded,
        },
        CreateExperiment {
            title: "Culture medium optimisation for Pleurotus ostreatus".into(),
            collection_id: Some(collections[1]),
            isolate_id: Some(isolates[1]),
            start_date: Some(date((2024, 4, 5))?),
            end_date: None,
            objective: Some("Develop a medium for fast growth and biomass production.".into()),
            methods: Some("Carbon sources, nitrogen sources and pH 5.0-8.0 screened.".into()),
            results: Some("Glucose 2%, peptone 0.5%, pH 6.5 gave 15.2 g/L dry biomass in 7 days.".into()),
            discussion: Some("Medium composition strongly affects growth.".into()),
            conclusions: Some("Optimised medium identified for scale-up.".into()),
            status: ExperimentStatus::InProgress,
        },
        CreateExperiment {
            title: "Antioxidant activity of Ganoderma lucidum extracts".into(),
            collection_id: Some(collections[3]),
            isolate_id: Some(isolates[3]),
            start_date: Some(date((2024, 4, 20))?),
            end_date: None,
            objective: Some("Assess antioxidant activity of in vitro cultivated extracts.".into()),
            methods: Some("Water and ethanol extraction; DPPH, ABTS and FRAP assays.".into()),
            results: Some("Ethanol extract IC50 (DPPH) 45.2 ug/mL.".into()),
            discussion: Some("Antioxidant properties persist in vitro.".into()),
            conclusions: Some("Cultivated extracts show significant antioxidant activity.".into()),
            status: ExperimentStatus::InProgress,
        },
    ])
}

fn date((y, m, d): (i32, u32, u32)) -> Result<CalendarDate, CoreError> {
    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| CoreError::Internal(format!("invalid sample date {y}-{m:02}-{d:02}")))
}
