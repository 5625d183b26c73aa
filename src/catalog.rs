//! The story catalog: a fixed, ordered set of stories and their quiz banks.
//!
//! Catalog order is unlock order. Each story carries an explicit, stable
//! sequence index so the unlock chain cannot drift if the source data is
//! ever reordered.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors from catalog validation.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no stories")]
    Empty,

    #[error("duplicate story id: {0}")]
    DuplicateId(String),

    #[error("duplicate sequence index {index} on story {story_id}")]
    DuplicateSequenceIndex { index: u32, story_id: String },

    #[error("question {question_id} has {count} options, needs at least 2")]
    TooFewOptions { question_id: String, count: usize },

    #[error("question {question_id} answer index {answer} out of range for {count} options")]
    AnswerOutOfRange {
        question_id: String,
        answer: usize,
        count: usize,
    },
}

/// The three staged quiz kinds, run in this order after reading a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizKind {
    MultipleChoice,
    SentenceCompletion,
    TitleSelection,
}

/// A single quiz question with one correct option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    pub kind: QuizKind,
    pub question: String,
    pub options: Vec<String>,
    /// 0-based index into `options`.
    pub correct_answer: usize,
}

impl QuizQuestion {
    /// Check a selected option index against the correct answer.
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_answer
    }
}

/// The three named question sets for one story. Sets may be empty
/// (placeholder stories that ship before their content is written).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizSets {
    pub multiple_choice: Vec<QuizQuestion>,
    pub sentence_completion: Vec<QuizQuestion>,
    pub title_selection: Vec<QuizQuestion>,
}

impl QuizSets {
    /// Get the question set for one quiz stage.
    pub fn set(&self, kind: QuizKind) -> &[QuizQuestion] {
        match kind {
            QuizKind::MultipleChoice => &self.multiple_choice,
            QuizKind::SentenceCompletion => &self.sentence_completion,
            QuizKind::TitleSelection => &self.title_selection,
        }
    }

    /// Iterate over every question across all three sets.
    pub fn iter(&self) -> impl Iterator<Item = &QuizQuestion> {
        self.multiple_choice
            .iter()
            .chain(self.sentence_completion.iter())
            .chain(self.title_selection.iter())
    }

    /// Total question count across all three sets.
    pub fn total_questions(&self) -> usize {
        self.multiple_choice.len() + self.sentence_completion.len() + self.title_selection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_questions() == 0
    }
}

/// An immutable story definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryDefinition {
    pub id: String,

    /// Stable position in the unlock chain. Completing the story at index
    /// `i` with 3 stars unlocks the story at index `i + 1`.
    pub sequence_index: u32,

    pub title: String,
    pub content: String,
    pub reading_time_minutes: u32,

    /// Asset key for the story illustration, resolved by the presentation
    /// layer.
    pub illustration: String,

    pub quizzes: QuizSets,
}

/// The ordered story catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    stories: Vec<StoryDefinition>,
}

impl Catalog {
    /// Build a catalog from story definitions, sorted by sequence index.
    ///
    /// Validates that ids and sequence indices are unique and that every
    /// question has at least two options with an in-range answer index.
    pub fn new(mut stories: Vec<StoryDefinition>) -> Result<Self, CatalogError> {
        if stories.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut ids = HashSet::new();
        let mut indices = HashSet::new();
        for story in &stories {
            if !ids.insert(story.id.clone()) {
                return Err(CatalogError::DuplicateId(story.id.clone()));
            }
            if !indices.insert(story.sequence_index) {
                return Err(CatalogError::DuplicateSequenceIndex {
                    index: story.sequence_index,
                    story_id: story.id.clone(),
                });
            }
            for question in story.quizzes.iter() {
                if question.options.len() < 2 {
                    return Err(CatalogError::TooFewOptions {
                        question_id: question.id.clone(),
                        count: question.options.len(),
                    });
                }
                if question.correct_answer >= question.options.len() {
                    return Err(CatalogError::AnswerOutOfRange {
                        question_id: question.id.clone(),
                        answer: question.correct_answer,
                        count: question.options.len(),
                    });
                }
            }
        }

        stories.sort_by_key(|s| s.sequence_index);
        Ok(Self { stories })
    }

    /// All stories in unlock order.
    pub fn stories(&self) -> &[StoryDefinition] {
        &self.stories
    }

    /// Look up a story by id.
    pub fn get(&self, story_id: &str) -> Option<&StoryDefinition> {
        self.stories.iter().find(|s| s.id == story_id)
    }

    /// The first story in the catalog, unlocked by default.
    pub fn first(&self) -> Option<&StoryDefinition> {
        self.stories.first()
    }

    /// The story that completing `story_id` unlocks, if any.
    ///
    /// Returns `None` when `story_id` is unknown or is the last entry.
    pub fn next_after(&self, story_id: &str) -> Option<&StoryDefinition> {
        let position = self.stories.iter().position(|s| s.id == story_id)?;
        self.stories.get(position + 1)
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}

// ============================================================================
// Built-in content
// ============================================================================

lazy_static! {
    static ref BUILTIN: Catalog = Catalog::new(builtin_stories())
        .expect("built-in catalog data is valid");
}

/// The catalog of stories shipped with the app.
pub fn builtin_catalog() -> &'static Catalog {
    &BUILTIN
}

fn mc(id: &str, question: &str, options: &[&str], correct_answer: usize) -> QuizQuestion {
    question_of(QuizKind::MultipleChoice, id, question, options, correct_answer)
}

fn sc(id: &str, question: &str, options: &[&str], correct_answer: usize) -> QuizQuestion {
    question_of(
        QuizKind::SentenceCompletion,
        id,
        question,
        options,
        correct_answer,
    )
}

fn ts(id: &str, question: &str, options: &[&str], correct_answer: usize) -> QuizQuestion {
    question_of(QuizKind::TitleSelection, id, question, options, correct_answer)
}

fn question_of(
    kind: QuizKind,
    id: &str,
    question: &str,
    options: &[&str],
    correct_answer: usize,
) -> QuizQuestion {
    QuizQuestion {
        id: id.to_string(),
        kind,
        question: question.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer,
    }
}

fn builtin_stories() -> Vec<StoryDefinition> {
    vec![
        StoryDefinition {
            id: "pig-story".to_string(),
            sequence_index: 0,
            title: "The Three Little Pigs Adventure".to_string(),
            content: "In the quiet village of Baconville lived three pig brothers - Porky, \
                      Becky and Gummy. One day, they heard that the farmer was planning a \
                      sausage fair and decided to run away to find the legendary Pig Treasure \
                      that gives freedom and happiness.\n\n\
                      They journeyed through a corn maze where crows gave them a riddle, \
                      crossed a \"bridge of luck\" after Becky guessed a slot machine \
                      combination, and encountered a fox-hunter in the mountains. Gummy \
                      pressed a slot machine lever that resulted in \"Oink - Oink - Oink!\" \
                      which led to a chest of gold appearing.\n\n\
                      The pigs realized the true treasure was freedom, courage and \
                      friendship. They founded the \"Oink Kingdom\" and lived happily ever \
                      after."
                .to_string(),
            reading_time_minutes: 2,
            illustration: "pig-story-illustration".to_string(),
            quizzes: QuizSets {
                multiple_choice: vec![
                    mc(
                        "q1",
                        "What were the names of the three little pigs?",
                        &[
                            "Tim, Tom and Ted",
                            "Porky, Becky and Gummy",
                            "Hans, Gretel and Henry",
                            "Lucky, Picky and Paco",
                        ],
                        1,
                    ),
                    mc(
                        "q2",
                        "Where did the little pigs live at the beginning of the story?",
                        &[
                            "In the forest",
                            "In the village of Baconville",
                            "On a farm by the sea",
                            "In the city",
                        ],
                        1,
                    ),
                    mc(
                        "q3",
                        "Who was the farmer in the village?",
                        &[
                            "Their father",
                            "The wolf",
                            "The man who decided to have a sausage fair",
                            "The cat",
                        ],
                        2,
                    ),
                    mc(
                        "q4",
                        "What did the little pigs decide to do when they heard about the fair?",
                        &["Run away", "Hide", "Attack", "Laugh"],
                        0,
                    ),
                    mc(
                        "q5",
                        "Where did they run away to?",
                        &["In the forest", "In the desert", "In the mountains", "In the field"],
                        1,
                    ),
                    mc(
                        "q6",
                        "What was the name of the treasure they were looking for?",
                        &["Book of Wisdom", "Pig Key", "Pig Treasure", "Golden Bucket"],
                        2,
                    ),
                    mc(
                        "q7",
                        "What did the legendary treasury give?",
                        &["Freedom and Happiness", "Food", "House", "Gold for the Farm"],
                        0,
                    ),
                    mc(
                        "q8",
                        "Who met them in the corn maze?",
                        &["Fox", "Crows", "Wolf", "Rabbits"],
                        1,
                    ),
                    mc(
                        "q9",
                        "What did the crows do?",
                        &["Asked a riddle", "Attacked", "Trapped", "Gave a coin"],
                        0,
                    ),
                    mc(
                        "q10",
                        "What was the name of the bravest pig?",
                        &["Porky", "Becky", "Gummy", "Lucky"],
                        1,
                    ),
                ],
                sentence_completion: vec![
                    sc(
                        "sc1",
                        "Complete the sentence: The pigs crossed the _____ of Luck.",
                        &["Bridge", "Road", "Path", "River"],
                        0,
                    ),
                    sc(
                        "sc2",
                        "Complete the sentence: The machine combination was _____ - _____ - _____.",
                        &[
                            "Oink - Oink - Oink",
                            "Pig - Pig - Pig",
                            "Lucky - Oink - Gold",
                            "Oink - Gold - Star",
                        ],
                        0,
                    ),
                ],
                title_selection: vec![
                    ts(
                        "ts1",
                        "What would be the best title for this story?",
                        &[
                            "The Great Escape",
                            "Pig Adventure",
                            "The Treasure Hunt",
                            "Oink Kingdom",
                        ],
                        0,
                    ),
                    ts(
                        "ts2",
                        "What is the main theme of this story?",
                        &[
                            "Adventure and Friendship",
                            "Gold and Wealth",
                            "Fear and Running",
                            "Magic and Mystery",
                        ],
                        0,
                    ),
                ],
            },
        },
        StoryDefinition {
            id: "cowboy-story".to_string(),
            sequence_index: 1,
            title: "The Legend of Pistolero".to_string(),
            content: "In the hot and dusty town of San Caliente, there lived a legendary \
                      gunslinger named Pistolero. Once a lawman, he was betrayed by his \
                      friend the sheriff and became an outlaw. He rode a dark brown horse \
                      across the desert filled with sand dunes and red rocks, searching for \
                      the legendary Fire Blaze treasure hidden in an old mine.\n\n\
                      The Black Coyotes gang chased him across the desert, wanting the Fire \
                      Blaze treasure that was said to contain the golden bullet of luck. \
                      Pistolero traveled at sunset under a fiery red sky, determined to find \
                      freedom. He found the entrance to the mine by following a coyote's \
                      howl and heard echoes of the past inside.\n\n\
                      The treasure was guarded by traps and fire. In the final scene, \
                      Pistolero shot the heart of the flame with his revolver, and the fire \
                      vanished. A golden treasure appeared, and a voice said \"Luck belongs \
                      to the brave.\" Pistolero raised his hat and rode away, having found \
                      his destiny.\n\n\
                      His red poncho and revolver symbolized justice and freedom. The story \
                      ended with a gunshot and silence, leaving only a golden glow in the \
                      desert. Pistolero became legendary for his courage and skill, proving \
                      that luck favors the brave."
                .to_string(),
            reading_time_minutes: 2,
            illustration: "cowboy-story-illustration".to_string(),
            quizzes: QuizSets {
                multiple_choice: vec![
                    mc(
                        "cowboy-q1",
                        "What was the cowboy's name?",
                        &["Pistolero", "Ramon", "El Toro", "Santiago"],
                        0,
                    ),
                    mc(
                        "cowboy-q2",
                        "Where did the story take place?",
                        &["In San Caliente", "In Santa Fe", "In Los Caballos", "In Rio Verde"],
                        0,
                    ),
                    mc(
                        "cowboy-q3",
                        "What kind of weather was described in the beginning?",
                        &[
                            "Hot and dusty",
                            "Cold and rainy",
                            "Windy and foggy",
                            "Stormy and dark",
                        ],
                        0,
                    ),
                    mc(
                        "cowboy-q4",
                        "What did Pistolero used to be?",
                        &["A lawman", "A thief", "A sheriff", "A farmer"],
                        0,
                    ),
                    mc(
                        "cowboy-q5",
                        "Who betrayed Pistolero?",
                        &["The sheriff", "His friend", "His horse", "A stranger"],
                        0,
                    ),
                    mc(
                        "cowboy-q6",
                        "What was the treasure called?",
                        &[
                            "The Fire Blaze treasure",
                            "The Gold Canyon chest",
                            "The Lost Coin of San Caliente",
                            "The Blaze of Luck",
                        ],
                        0,
                    ),
                    mc(
                        "cowboy-q7",
                        "Where was the Fire Blaze treasure hidden?",
                        &[
                            "In an old mine",
                            "In a desert cave",
                            "Under the saloon",
                            "Behind a waterfall",
                        ],
                        0,
                    ),
                    mc(
                        "cowboy-q8",
                        "What was said to be inside the treasure?",
                        &[
                            "The golden bullet of luck",
                            "A cursed diamond",
                            "A sheriff's badge",
                            "A map",
                        ],
                        0,
                    ),
                    mc(
                        "cowboy-q9",
                        "What did Pistolero ride?",
                        &[
                            "A dark brown horse",
                            "A black bull",
                            "A red mustang",
                            "A white donkey",
                        ],
                        0,
                    ),
                    mc(
                        "cowboy-q10",
                        "Who chased Pistolero across the desert?",
                        &[
                            "The Black Coyotes gang",
                            "The Red Hawks",
                            "The Desert Snakes",
                            "The Sand Bandits",
                        ],
                        0,
                    ),
                    mc(
                        "cowboy-q11",
                        "What weapon did Pistolero carry?",
                        &["A revolver", "A rifle", "A bow", "A sword"],
                        0,
                    ),
                    mc(
                        "cowboy-q12",
                        "What did the bandits want from him?",
                        &["The Fire Blaze treasure", "His revolver", "His horse", "Revenge"],
                        0,
                    ),
                    mc(
                        "cowboy-q13",
                        "What was the desert filled with?",
                        &[
                            "Sand dunes and red rocks",
                            "Snow and cactus",
                            "Rivers and grass",
                            "Trees and fog",
                        ],
                        0,
                    ),
                    mc(
                        "cowboy-q14",
                        "What time of day did Pistolero travel?",
                        &["At sunset", "At dawn", "At midnight", "In the morning"],
                        0,
                    ),
                    mc(
                        "cowboy-q15",
                        "What was Pistolero searching for?",
                        &["Freedom", "Revenge", "Home", "Friends"],
                        0,
                    ),
                    mc(
                        "cowboy-q16",
                        "What was the color of the sky during his journey?",
                        &["Fiery red", "Dark purple", "Cloudy gray", "Pale blue"],
                        0,
                    ),
                    mc(
                        "cowboy-q17",
                        "How did Pistolero find the entrance to the mine?",
                        &[
                            "By following a map",
                            "By accident",
                            "By a coyote's howl",
                            "By the sheriff's message",
                        ],
                        2,
                    ),
                    mc(
                        "cowboy-q18",
                        "What did he hear inside the mine?",
                        &[
                            "Echoes of the past",
                            "The sound of gold",
                            "Gunfire",
                            "The sheriff's voice",
                        ],
                        0,
                    ),
                    mc(
                        "cowboy-q19",
                        "Who guarded the treasure?",
                        &["Traps and fire", "A bandit", "A ghost", "A wolf"],
                        0,
                    ),
                    mc(
                        "cowboy-q20",
                        "What did Pistolero shoot in the final scene?",
                        &[
                            "The heart of the flame",
                            "The sheriff",
                            "The bandit leader",
                            "The mine door",
                        ],
                        0,
                    ),
                ],
                sentence_completion: vec![
                    sc(
                        "cowboy-sc1",
                        "Complete the sentence: Pistolero was once a _____ who was betrayed.",
                        &["lawman", "thief", "sheriff", "farmer"],
                        0,
                    ),
                    sc(
                        "cowboy-sc2",
                        "Complete the sentence: The voice said \"_____ belongs to the brave.\"",
                        &["Luck", "Gold", "Fire", "Courage"],
                        0,
                    ),
                ],
                title_selection: vec![
                    ts(
                        "cowboy-ts1",
                        "What would be the best title for this story?",
                        &[
                            "The Legend of Pistolero",
                            "The Desert Treasure",
                            "The Sheriff's Betrayal",
                            "The Golden Bullet",
                        ],
                        0,
                    ),
                    ts(
                        "cowboy-ts2",
                        "What is the main theme of this story?",
                        &[
                            "Courage and destiny",
                            "Gold and greed",
                            "Betrayal and revenge",
                            "Friendship and loyalty",
                        ],
                        0,
                    ),
                ],
            },
        },
        StoryDefinition {
            id: "zeus-story".to_string(),
            sequence_index: 2,
            title: "The Zeus Adventure".to_string(),
            content: "This story will be unlocked after completing the cowboy story."
                .to_string(),
            reading_time_minutes: 2,
            illustration: "zeus-story-illustration".to_string(),
            quizzes: QuizSets::default(),
        },
        StoryDefinition {
            id: "reader-story".to_string(),
            sequence_index: 3,
            title: "The Reader Adventure".to_string(),
            content: "This story will be unlocked after completing the Zeus story.".to_string(),
            reading_time_minutes: 2,
            illustration: "reader-story-illustration".to_string(),
            quizzes: QuizSets::default(),
        },
    ]
}
