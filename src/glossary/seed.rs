//! Seed data used to populate an empty glossary.

use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::glossary::database::Database;
use crate::glossary::error::Result;
use crate::glossary::store::TermStore;
use crate::glossary::term::TermInput;

/// Errors reading a seed file.
#[derive(Debug)]
pub enum SeedError {
    ReadFile { source: std::io::Error },
    ParseJson { source: serde_json::Error },
}

impl std::fmt::Display for SeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFile { source } => write!(f, "failed to read seed file: {}", source),
            Self::ParseJson { source } => write!(f, "failed to parse seed file: {}", source),
        }
    }
}

impl std::error::Error for SeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source } => Some(source),
            Self::ParseJson { source } => Some(source),
        }
    }
}

struct SeedTerm {
    russian_term: &'static str,
    chinese_term: &'static str,
    pinyin: &'static str,
    description: &'static str,
    example: &'static str,
    category: &'static str,
}

const DEFAULT_TERMS: &[SeedTerm] = &[
    SeedTerm {
        russian_term: "декарбонизация",
        chinese_term: "脱碳",
        pinyin: "tuō tàn",
        description: "Процесс сокращения выбросов диоксида углерода в атмосферу.",
        example: "Декарбонизация промышленности является ключевым шагом в борьбе с изменением климата.",
        category: "Углеродное регулирование",
    },
    SeedTerm {
        russian_term: "низкоуглеродное развитие",
        chinese_term: "低碳发展",
        pinyin: "dī tàn fā zhǎn",
        description: "Модель экономического развития с низкими выбросами диоксида углерода.",
        example: "Низкоуглеродное развитие способствует устойчивому будущему.",
        category: "Углеродное регулирование",
    },
    SeedTerm {
        russian_term: "квоты на выбросы парниковых газов",
        chinese_term: "温室气体排放配额",
        pinyin: "wēn shì qì tǐ páifàng pèi'é",
        description: "Лимиты на выбросы парниковых газов для предприятий.",
        example: "Введение квот на выбросы парниковых газов стимулирует компании к снижению эмиссий.",
        category: "Углеродное регулирование",
    },
    SeedTerm {
        russian_term: "углеродные единицы",
        chinese_term: "碳单位",
        pinyin: "tàn dānwèi",
        description: "Единицы, измеряющие количество выброшенного диоксида углерода.",
        example: "Компании покупают углеродные единицы для компенсации своих выбросов.",
        category: "Углеродное регулирование",
    },
    SeedTerm {
        russian_term: "таксономия",
        chinese_term: "分类法",
        pinyin: "fēnlèi fǎ",
        description: "Система классификации, используемая для организации и оценки устойчивых инвестиций.",
        example: "Таксономия помогает инвесторам идентифицировать экологически устойчивые проекты.",
        category: "Углеродное регулирование",
    },
    SeedTerm {
        russian_term: "зеленые облигации",
        chinese_term: "绿色债券",
        pinyin: "lǜsè zhàiquàn",
        description: "Финансовые инструменты для финансирования экологически устойчивых проектов.",
        example: "Компания выпустила зеленые облигации для финансирования газовых электростанций.",
        category: "Углеродное регулирование",
    },
    SeedTerm {
        russian_term: "природный газ",
        chinese_term: "天然气",
        pinyin: "tiānrán qì",
        description: "Горючее ископаемое, используемое для производства энергии.",
        example: "Природный газ является самым экологически чистым ископаемым топливом.",
        category: "Энергетический переход",
    },
    SeedTerm {
        russian_term: "углеродный след",
        chinese_term: "碳足迹",
        pinyin: "tàn zújì",
        description: "Общее количество выбросов углерода, связанных с деятельностью человека.",
        example: "Сокращение углеродного следа помогает уменьшить негативное воздействие на климат.",
        category: "Энергетический переход",
    },
    SeedTerm {
        russian_term: "энергетическая рентабельность",
        chinese_term: "能源效率",
        pinyin: "néngyuán xiàolǜ",
        description: "Мера эффективности использования энергии.",
        example: "Повышение энергетической рентабельности снижает затраты на производство.",
        category: "Энергетический переход",
    },
    SeedTerm {
        russian_term: "улавливание и утилизация (диоксида) углерода",
        chinese_term: "碳捕集与利用",
        pinyin: "tàn bǔjí yǔ lìyòng",
        description: "Технологии по захвату и использованию углекислого газа из промышленных процессов.",
        example: "Улавливание и утилизация углерода помогают снизить выбросы в атмосферу.",
        category: "Энергетический переход",
    },
    SeedTerm {
        russian_term: "водородная энергетика",
        chinese_term: "氢能",
        pinyin: "qīng néng",
        description: "Использование водорода как источника энергии.",
        example: "Водородная энергетика перспективна для создания чистых транспортных средств.",
        category: "Вторичные источники энергии",
    },
    SeedTerm {
        russian_term: "утилизация тепла",
        chinese_term: "热能利用",
        pinyin: "rè néng lìyòng",
        description: "Использование отходящего тепла для полезных целей.",
        example: "Утилизация тепла повышает общую энергетическую эффективность предприятия.",
        category: "Вторичные источники энергии",
    },
];

/// The built-in low-carbon energy term list.
pub fn default_terms() -> Vec<TermInput> {
    DEFAULT_TERMS
        .iter()
        .map(|t| {
            TermInput::new(
                t.russian_term,
                t.chinese_term,
                t.pinyin,
                t.description,
                t.example,
                t.category,
            )
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SeedFile {
    List(Vec<TermInput>),
    Wrapped { terms: Vec<TermInput> },
}

/// Load terms from a JSON file: either a bare array or `{"terms": [...]}`.
pub fn load_seed_file(path: &Path) -> std::result::Result<Vec<TermInput>, SeedError> {
    let content = std::fs::read_to_string(path).map_err(|e| SeedError::ReadFile { source: e })?;
    let file: SeedFile =
        serde_json::from_str(&content).map_err(|e| SeedError::ParseJson { source: e })?;
    Ok(match file {
        SeedFile::List(terms) => terms,
        SeedFile::Wrapped { terms } => terms,
    })
}

/// Insert `terms` if the store holds nothing yet. Returns how many were inserted.
///
/// Must finish before the bot starts serving queries.
pub fn populate_if_empty(db: &Database, terms: &[TermInput]) -> Result<usize> {
    let count = db.count_all()?;
    if count > 0 {
        info!("Glossary already holds {} terms, skipping seed", count);
        return Ok(0);
    }

    info!("Glossary is empty, seeding {} terms", terms.len());
    let inserted = db.insert_many(terms)?;
    info!("Seeded glossary with {} terms", inserted);
    Ok(inserted)
}
