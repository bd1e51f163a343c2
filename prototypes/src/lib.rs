use triage_core::model::DiseaseRecord;

/// Generates a synthetic disease dataset for load tests and benchmarks.
///
/// Symptoms are drawn from a shared vocabulary of `vocabulary` terms so that
/// neighbouring diseases overlap, which is what makes symptom → disease
/// fan-out realistic.
pub fn synthetic_records(
    diseases: usize,
    symptoms_per_disease: usize,
    vocabulary: usize,
) -> Vec<DiseaseRecord> {
    let vocabulary = vocabulary.max(1);
    (0..diseases)
        .map(|d| {
            let symptoms = (0..symptoms_per_disease)
                .map(|s| format!("symptom {}", (d * 7 + s * 13) % vocabulary));
            let precautions = (0..2).map(|p| format!("precaution {}", (d + p) % 16));
            DiseaseRecord::new(format!("disease {d}"), symptoms, precautions)
        })
        .collect()
}

/// A query mentioning `mentions` vocabulary terms, one sentence each.
pub fn synthetic_query(seed: usize, mentions: usize, vocabulary: usize) -> String {
    let vocabulary = vocabulary.max(1);
    (0..mentions)
        .map(|m| format!("I have symptom {}.", (seed * 31 + m * 17) % vocabulary))
        .collect::<Vec<_>>()
        .join(" ")
}
