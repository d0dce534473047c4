use compass_common::{Category, PathCatalog, PathId, QuestionId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::Path;

use crate::question::{AnswerOption, Question};

/// Errors from building or loading a question bank.
#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported bank file extension: {0:?}")]
    UnsupportedFormat(String),
    #[error("question bank is empty")]
    Empty,
    #[error("career path {0} is listed twice in the catalog")]
    DuplicateCatalogPath(PathId),
    #[error("duplicate question id {0}")]
    DuplicateQuestion(QuestionId),
    #[error("{question} has {count} options, expected {min}..={max}")]
    OptionCount {
        question: QuestionId,
        count: usize,
        min: usize,
        max: usize,
    },
    #[error("{question} option {value:?} names no career path")]
    NoPaths { question: QuestionId, value: String },
    #[error("{question} option {value:?} names a path twice")]
    DuplicatePath { question: QuestionId, value: String },
    #[error("{question} has two options with value {value:?}")]
    DuplicateOption { question: QuestionId, value: String },
    #[error("{question} option {value:?} is worth zero points")]
    ZeroPoints { question: QuestionId, value: String },
}

/// Structural rules a bank must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankRules {
    pub min_options: usize,
    pub max_options: usize,
    pub allow_zero_points: bool,
}

impl Default for BankRules {
    fn default() -> Self {
        Self {
            min_options: 3,
            max_options: 5,
            allow_zero_points: false,
        }
    }
}

impl BankRules {
    /// Accepts any non-empty option list and zero-point options.
    pub fn permissive() -> Self {
        Self {
            min_options: 1,
            max_options: usize::MAX,
            allow_zero_points: true,
        }
    }
}

/// On-disk layout of a bank file. `paths` defaults to the built-in catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BankFile {
    #[serde(default)]
    paths: PathCatalog,
    questions: Vec<Question>,
}

/// Immutable, validated, ordered set of questions.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    catalog: PathCatalog,
    questions: Vec<Question>,
    fingerprint: String,
}

impl QuestionBank {
    /// Validate `questions` against `rules` and build a bank over `catalog`.
    pub fn new(
        catalog: PathCatalog,
        questions: Vec<Question>,
        rules: BankRules,
    ) -> Result<Self, BankError> {
        validate_catalog(&catalog)?;
        validate(&questions, rules)?;
        let file = BankFile {
            paths: catalog,
            questions,
        };
        let fingerprint = hex_digest(&serde_json::to_vec(&file)?);
        tracing::debug!(
            questions = file.questions.len(),
            paths = file.paths.len(),
            %fingerprint,
            "question bank ready"
        );
        Ok(Self {
            catalog: file.paths,
            questions: file.questions,
            fingerprint,
        })
    }

    /// The five-question career quiz.
    pub fn builtin() -> Self {
        Self::new(
            PathCatalog::builtin(),
            builtin_questions(),
            BankRules::default(),
        )
        .unwrap_or_else(|e| unreachable!("built-in bank is valid: {e}"))
    }

    pub fn from_json_str(data: &str, rules: BankRules) -> Result<Self, BankError> {
        let file: BankFile = serde_json::from_str(data)?;
        Self::new(file.paths, file.questions, rules)
    }

    pub fn from_yaml_str(data: &str, rules: BankRules) -> Result<Self, BankError> {
        let file: BankFile = serde_yaml::from_str(data)?;
        Self::new(file.paths, file.questions, rules)
    }

    /// Load a bank file. The format follows the extension: `.json`, `.yaml` or `.yml`.
    pub fn load(path: impl AsRef<Path>, rules: BankRules) -> Result<Self, BankError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let parse: fn(&str, BankRules) -> Result<Self, BankError> = match ext.as_str() {
            "json" => Self::from_json_str,
            "yaml" | "yml" => Self::from_yaml_str,
            _ => return Err(BankError::UnsupportedFormat(ext)),
        };
        tracing::debug!(path = %path.display(), "loading question bank");
        let data = std::fs::read_to_string(path)?;
        parse(&data, rules)
    }

    /// Serialize the bank (catalog included) as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, BankError> {
        let file = BankFile {
            paths: self.catalog.clone(),
            questions: self.questions.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn catalog(&self) -> &PathCatalog {
        &self.catalog
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Zero-based position of `id` in bank order.
    pub fn index_of(&self, id: QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// SHA-256 (hex) of the canonical JSON encoding of catalog and questions.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn validate_catalog(catalog: &PathCatalog) -> Result<(), BankError> {
    let mut ids = HashSet::new();
    for profile in catalog.iter() {
        if !ids.insert(&profile.id) {
            return Err(BankError::DuplicateCatalogPath(profile.id.clone()));
        }
    }
    Ok(())
}

fn validate(questions: &[Question], rules: BankRules) -> Result<(), BankError> {
    if questions.is_empty() {
        return Err(BankError::Empty);
    }
    let mut ids = HashSet::new();
    for q in questions {
        if !ids.insert(q.id) {
            return Err(BankError::DuplicateQuestion(q.id));
        }
        let count = q.options.len();
        if count == 0 || count < rules.min_options || count > rules.max_options {
            return Err(BankError::OptionCount {
                question: q.id,
                count,
                min: rules.min_options,
                max: rules.max_options,
            });
        }
        let mut values = HashSet::new();
        for option in &q.options {
            let question = q.id;
            let value = || option.value.clone();
            if !values.insert(option.value.as_str()) {
                return Err(BankError::DuplicateOption { question, value: value() });
            }
            if option.paths.is_empty() {
                return Err(BankError::NoPaths { question, value: value() });
            }
            let distinct: HashSet<_> = option.paths.iter().collect();
            if distinct.len() != option.paths.len() {
                return Err(BankError::DuplicatePath { question, value: value() });
            }
            if option.points == 0 && !rules.allow_zero_points {
                return Err(BankError::ZeroPoints { question, value: value() });
            }
        }
    }
    Ok(())
}

fn hex_digest(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn builtin_questions() -> Vec<Question> {
    let q = |id: u32, prompt: &str, category: Category, options: Vec<AnswerOption>| Question {
        id: QuestionId(id),
        prompt: prompt.into(),
        category,
        options,
    };
    vec![
        q(
            1,
            "What type of problems do you enjoy solving the most?",
            Category::Interests,
            vec![
                AnswerOption::new(
                    "Coding and technical challenges",
                    "technical",
                    &["tech", "science"],
                    10,
                ),
                AnswerOption::new("Helping people with their health", "health", &["healthcare"], 10),
                AnswerOption::new("Creating beautiful designs", "creative", &["arts"], 10),
                AnswerOption::new("Business strategy and planning", "business", &["business"], 10),
            ],
        ),
        q(
            2,
            "Which activity energizes you the most?",
            Category::Strengths,
            vec![
                AnswerOption::new("Building apps and websites", "building", &["tech"], 8),
                AnswerOption::new(
                    "Researching medical breakthroughs",
                    "research",
                    &["healthcare", "science"],
                    8,
                ),
                AnswerOption::new("Designing visual experiences", "designing", &["arts"], 8),
                AnswerOption::new("Leading team projects", "leading", &["business"], 8),
            ],
        ),
        q(
            3,
            "What's your preferred work environment?",
            Category::Skills,
            vec![
                AnswerOption::new("Tech startup with cutting-edge tools", "startup", &["tech"], 9),
                AnswerOption::new(
                    "Hospital or research lab",
                    "medical",
                    &["healthcare", "science"],
                    9,
                ),
                AnswerOption::new("Creative studio with artistic freedom", "studio", &["arts"], 9),
                AnswerOption::new(
                    "Corporate office with growth opportunities",
                    "corporate",
                    &["business"],
                    9,
                ),
            ],
        ),
        q(
            4,
            "Which skill do you want to develop further?",
            Category::Skills,
            vec![
                AnswerOption::new("Programming and AI", "programming", &["tech"], 10),
                AnswerOption::new(
                    "Medical knowledge and patient care",
                    "medical",
                    &["healthcare"],
                    10,
                ),
                AnswerOption::new("Artistic techniques and creativity", "artistic", &["arts"], 10),
                AnswerOption::new("Leadership and business acumen", "business", &["business"], 10),
            ],
        ),
        q(
            5,
            "What motivates you most in your future career?",
            Category::Interests,
            vec![
                AnswerOption::new(
                    "Innovation and technological advancement",
                    "innovation",
                    &["tech", "science"],
                    10,
                ),
                AnswerOption::new("Saving lives and improving health", "health", &["healthcare"], 10),
                AnswerOption::new(
                    "Self-expression and inspiring others",
                    "expression",
                    &["arts"],
                    10,
                ),
                AnswerOption::new("Financial success and influence", "success", &["business"], 10),
            ],
        ),
    ]
}
