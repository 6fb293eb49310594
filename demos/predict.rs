//! Train both categories on a small synthetic collection, then predict one dwelling.
//!
//! Run with `RUST_LOG=hearth=debug` to see the provenance logs.

use hearth::config::DEFAULT_COLLECTION;
use hearth::{
    Category, ClassificationPipeline, ClusterTrainer, ClusteringConfig, ConsumptionEstimator,
    InMemoryStore, PipelineConfig, Record,
};
use tracing_subscriber::EnvFilter;

fn dwelling(id: String, category: Category, grade: f64, occupants: f64, kwh: f64) -> Record {
    Record::new(
        id,
        category,
        kwh,
        [
            ("Dwelling Grade".to_string(), grade),
            ("Occupants".to_string(), occupants),
        ],
    )
}

fn main() -> Result<(), hearth::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = InMemoryStore::new();
    let mut records = Vec::new();
    for (c, category) in Category::ALL.into_iter().enumerate() {
        for (i, grade) in [0.0, 0.4, 0.7, 1.0].into_iter().enumerate() {
            for j in 0..3 {
                let occupants = 0.2 * j as f64;
                let kwh = 0.1 + grade * 0.3 + occupants * 0.1 + c as f64 * 0.05;
                records.push(dwelling(
                    format!("{}-{i}-{j}", category.tag()),
                    category,
                    grade,
                    occupants,
                    kwh,
                ));
            }
        }
    }
    store.insert(DEFAULT_COLLECTION, records)?;

    let config = ClusteringConfig::from_json(
        r#"{
            "Yes": {"n_clusters": 3, "linkage": "average", "metric": "l1"},
            "No":  {"n_clusters": 4, "linkage": "average", "metric": "euclidean"}
        }"#,
    )?;
    for (category, result) in ClusterTrainer::new(&store, config).train_all() {
        match result {
            Ok(report) => println!(
                "{category}: {} records in {} clusters",
                report.records(),
                report.clusters
            ),
            Err(e) => println!("{category}: training failed: {e}"),
        }
    }

    let pipeline = ClassificationPipeline::with_config(&store, PipelineConfig::from_json("{}")?)?;
    let new = dwelling("new".to_string(), Category::HeatingPresent, 0.7, 0.3, 0.42);
    match pipeline.predict(&new) {
        Ok(prediction) => {
            println!(
                "predicted {:.3} kWh/day/m2 (cluster {}), actual {:.3}: {:?}",
                prediction.consumption,
                prediction.label,
                new.target_consumption,
                prediction.assess(new.target_consumption)
            );
            for s in ConsumptionEstimator.summaries(&prediction.historical) {
                println!(
                    "  cluster {}: n={} mean={:.3} range=[{:.3}, {:.3}]",
                    s.label, s.count, s.mean, s.min, s.max
                );
            }
            let grades =
                ConsumptionEstimator.mean_by_feature(&prediction.historical, "Dwelling Grade");
            for g in grades {
                println!("  grade {:.1}: mean={:.3} (n={})", g.value, g.mean, g.count);
            }
        }
        Err(e) => println!("{}", e.user_message()),
    }
    Ok(())
}
