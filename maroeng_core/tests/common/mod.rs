#![allow(dead_code)]

use chrono::{DateTime, Utc};

use maroeng_core::{Catalog, Frame, Grade, ReviewRecord};

pub fn frame(id: i64, block: &str, text_en: &str, hint_ru: &str) -> Frame {
    Frame {
        id,
        block: block.to_string(),
        text_en: text_en.to_string(),
        hint_ru: hint_ru.to_string(),
        distractors: None,
    }
}

/// Small two-course catalog; every third Core frame carries curated wrong answers.
pub fn seed_catalog(core: i64, level2: i64) -> Catalog {
    let core_frames = (1..=core)
        .map(|i| {
            let mut f = frame(i, if i % 2 == 0 { "Core" } else { "Modals" }, &format!("I could try phrase {i}"), &format!("фраза {i}"));
            if i % 3 == 0 {
                f.distractors = Some(vec![
                    format!("неверно {i}a"),
                    format!("неверно {i}b"),
                    format!("неверно {i}c"),
                    format!("неверно {i}d"),
                ]);
            }
            f
        })
        .collect();
    let level2_frames = (0..level2)
        .map(|i| frame(1000 + i, "Level 2", &format!("Let me think about {i}"), &format!("уровень {i}")))
        .collect();
    Catalog::new(core_frames, level2_frames).expect("seed catalog")
}

pub fn at(s: &str) -> DateTime<Utc> {
    s.parse().expect("timestamp")
}

pub fn record(id: i64, interval: u32, lapses: u32, due: DateTime<Utc>) -> ReviewRecord {
    ReviewRecord {
        id,
        ease: Grade::Good,
        interval,
        due_date: due,
        lapses,
        last_seen: due,
    }
}
