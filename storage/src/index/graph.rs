use std::collections::{HashMap, HashSet};
use thiserror::Error;
use triage_core::error::{ErrorCode, TriageError};
use triage_core::model::{DiseaseRecord, Relation};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("record has no disease name")]
    MissingDisease,
}

impl TriageError for GraphError {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::InvalidArgument
    }
}

/// A disease node with its outgoing `has_symptom` and `has_precaution` edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiseaseEntry {
    pub name: String,
    /// Distinct symptom nodes, in first-seen order.
    pub symptoms: Vec<String>,
    /// Precaution texts for this disease only, in first-seen order.
    pub precautions: Vec<String>,
}

/// Typed edge view: `(disease) -[relation]-> (target)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphEdge<'a> {
    pub disease: &'a str,
    pub relation: Relation,
    pub target: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphStats {
    pub diseases: usize,
    pub symptoms: usize,
    pub precautions: usize,
    pub edges: usize,
}

/// Disease / symptom / precaution knowledge graph.
///
/// Only two traversals are ever needed (disease → symptoms/precautions and
/// symptom → diseases), so the graph is kept as two adjacency maps instead of
/// a generic labelled graph. Symptom nodes are shared by text across diseases.
/// Insertion order is preserved everywhere so that downstream ranking ties are
/// resolved deterministically.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    diseases: Vec<DiseaseEntry>,
    disease_ids: HashMap<String, usize>,
    symptoms: Vec<String>,
    symptom_ids: HashMap<String, usize>,
    /// symptom id -> disease ids
    symptom_diseases: Vec<Vec<usize>>,
    /// Precaution nodes interned by text. Lookups by disease go through the
    /// disease's own edge list, never through this set.
    precaution_nodes: HashSet<String>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a DiseaseRecord>,
    ) -> (Self, Vec<(usize, GraphError)>) {
        let mut graph = Self::new();
        let mut rejected = Vec::new();
        for (idx, record) in records.into_iter().enumerate() {
            if let Err(err) = graph.add_record(record) {
                tracing::warn!("Rejected dataset record {}: {}", idx, err);
                rejected.push((idx, err));
            }
        }
        (graph, rejected)
    }

    /// Adds a record's disease, symptom and precaution nodes and edges.
    /// Re-adding existing nodes or edges is a no-op; returns whether anything
    /// new was added.
    pub fn add_record(&mut self, record: &DiseaseRecord) -> Result<bool, GraphError> {
        if record.disease.trim().is_empty() {
            return Err(GraphError::MissingDisease);
        }

        let (disease_id, mut changed) = self.upsert_disease(&record.disease);
        for symptom in &record.symptoms {
            changed |= self.add_symptom_edge(disease_id, symptom);
        }
        for precaution in &record.precautions {
            changed |= self.add_precaution_edge(disease_id, precaution);
        }
        Ok(changed)
    }

    /// Merges every node and edge of `other` into `self`.
    pub fn merge(&mut self, other: &KnowledgeGraph) -> bool {
        let mut changed = false;
        for entry in &other.diseases {
            let (disease_id, added) = self.upsert_disease(&entry.name);
            changed |= added;
            for symptom in &entry.symptoms {
                changed |= self.add_symptom_edge(disease_id, symptom);
            }
            for precaution in &entry.precautions {
                changed |= self.add_precaution_edge(disease_id, precaution);
            }
        }
        changed
    }

    fn upsert_disease(&mut self, name: &str) -> (usize, bool) {
        if let Some(id) = self.disease_ids.get(name) {
            return (*id, false);
        }
        let id = self.diseases.len();
        self.diseases.push(DiseaseEntry {
            name: name.to_string(),
            symptoms: Vec::new(),
            precautions: Vec::new(),
        });
        self.disease_ids.insert(name.to_string(), id);
        (id, true)
    }

    fn add_symptom_edge(&mut self, disease_id: usize, symptom: &str) -> bool {
        let symptom_id = match self.symptom_ids.get(symptom) {
            Some(id) => *id,
            None => {
                let id = self.symptoms.len();
                self.symptoms.push(symptom.to_string());
                self.symptom_ids.insert(symptom.to_string(), id);
                self.symptom_diseases.push(Vec::new());
                id
            }
        };

        let linked = &mut self.symptom_diseases[symptom_id];
        if linked.contains(&disease_id) {
            return false;
        }
        linked.push(disease_id);
        self.diseases[disease_id].symptoms.push(symptom.to_string());
        true
    }

    fn add_precaution_edge(&mut self, disease_id: usize, precaution: &str) -> bool {
        self.precaution_nodes.insert(precaution.to_string());
        let precautions = &mut self.diseases[disease_id].precautions;
        if precautions.iter().any(|p| p == precaution) {
            return false;
        }
        precautions.push(precaution.to_string());
        true
    }

    pub fn disease(&self, name: &str) -> Option<&DiseaseEntry> {
        self.disease_ids.get(name).map(|id| &self.diseases[*id])
    }

    pub fn contains_symptom(&self, symptom: &str) -> bool {
        self.symptom_ids.contains_key(symptom)
    }

    /// Diseases linked to `symptom`, in the order the edges were added.
    pub fn diseases_with_symptom<'a>(&'a self, symptom: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.symptom_ids
            .get(symptom)
            .map(|id| self.symptom_diseases[*id].as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |disease_id| self.diseases[*disease_id].name.as_str())
    }

    pub fn symptoms_of(&self, disease: &str) -> &[String] {
        self.disease(disease)
            .map(|entry| entry.symptoms.as_slice())
            .unwrap_or_default()
    }

    pub fn precautions_of(&self, disease: &str) -> &[String] {
        self.disease(disease)
            .map(|entry| entry.precautions.as_slice())
            .unwrap_or_default()
    }

    /// Number of distinct symptom nodes connected to `disease`.
    pub fn symptom_count(&self, disease: &str) -> usize {
        self.symptoms_of(disease).len()
    }

    pub fn diseases(&self) -> impl Iterator<Item = &DiseaseEntry> {
        self.diseases.iter()
    }

    /// Every symptom node once, in first-seen order.
    pub fn symptoms(&self) -> &[String] {
        &self.symptoms
    }

    pub fn edges(&self) -> impl Iterator<Item = GraphEdge<'_>> {
        self.diseases.iter().flat_map(|entry| {
            let symptoms = entry.symptoms.iter().map(move |symptom| GraphEdge {
                disease: entry.name.as_str(),
                relation: Relation::HasSymptom,
                target: symptom.as_str(),
            });
            let precautions = entry.precautions.iter().map(move |precaution| GraphEdge {
                disease: entry.name.as_str(),
                relation: Relation::HasPrecaution,
                target: precaution.as_str(),
            });
            symptoms.chain(precautions)
        })
    }

    pub fn edge_count(&self) -> usize {
        self.diseases
            .iter()
            .map(|entry| entry.symptoms.len() + entry.precautions.len())
            .sum()
    }

    pub fn node_count(&self) -> usize {
        self.diseases.len() + self.symptoms.len() + self.precaution_nodes.len()
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            diseases: self.diseases.len(),
            symptoms: self.symptoms.len(),
            precautions: self.precaution_nodes.len(),
            edges: self.edge_count(),
        }
    }
}
