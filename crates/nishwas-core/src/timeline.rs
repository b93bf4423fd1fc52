//! Static health-benefit timeline and program milestone tables.
//!
//! Two fixed tables drive every achievement metric:
//! - the minute-ordered health timeline (20 minutes after quitting through
//!   15 years), each entry a physiological improvement
//! - the 41-day program's badge milestones at days 1, 3, 7, 14, 21, 30, 41
//!
//! Display texts are Bangla, matching the rest of the app's UI strings.

use serde::{Deserialize, Serialize};

/// The program runs from day 1 (the quit day) through day 41.
pub const PROGRAM_LENGTH_DAYS: u32 = 41;

/// Badge awarded when a milestone day is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTier {
    Bronze,
    Silver,
    Gold,
    Diamond,
}

/// One fixed day-threshold of the program.
#[derive(Debug, Clone, Copy)]
pub struct MilestoneDef {
    pub day: u32,
    pub tier: BadgeTier,
    pub title: &'static str,
}

/// Badge milestones, ascending by day.
pub const MILESTONE_DAYS: [MilestoneDef; 7] = [
    MilestoneDef {
        day: 1,
        tier: BadgeTier::Bronze,
        title: "প্রথম দিন",
    },
    MilestoneDef {
        day: 3,
        tier: BadgeTier::Bronze,
        title: "তিন দিন",
    },
    MilestoneDef {
        day: 7,
        tier: BadgeTier::Silver,
        title: "এক সপ্তাহ",
    },
    MilestoneDef {
        day: 14,
        tier: BadgeTier::Silver,
        title: "দুই সপ্তাহ",
    },
    MilestoneDef {
        day: 21,
        tier: BadgeTier::Gold,
        title: "তিন সপ্তাহ",
    },
    MilestoneDef {
        day: 30,
        tier: BadgeTier::Gold,
        title: "এক মাস",
    },
    MilestoneDef {
        day: PROGRAM_LENGTH_DAYS,
        tier: BadgeTier::Diamond,
        title: "প্রোগ্রাম সম্পন্ন",
    },
];

/// One physiological improvement threshold.
#[derive(Debug, Clone, Copy)]
pub struct HealthTimelineEntry {
    pub id: &'static str,
    /// Minutes after the quit instant at which the benefit is reached.
    pub minutes_after_quit: i64,
    pub title: &'static str,
    pub description: &'static str,
}

/// The health-benefit timeline, strictly ascending by minutes.
pub fn health_timeline() -> &'static [HealthTimelineEntry] {
    &HEALTH_TIMELINE
}

static HEALTH_TIMELINE: [HealthTimelineEntry; 14] = [
    HealthTimelineEntry {
        id: "heart-rate",
        minutes_after_quit: 20,
        title: "হৃদস্পন্দন স্বাভাবিক",
        description: "হৃদস্পন্দন ও রক্তচাপ স্বাভাবিক মাত্রায় নেমে আসে।",
    },
    HealthTimelineEntry {
        id: "carbon-monoxide",
        minutes_after_quit: 12 * 60,
        title: "কার্বন মনোক্সাইড স্বাভাবিক",
        description: "রক্তে কার্বন মনোক্সাইডের মাত্রা স্বাভাবিক হয়ে যায়।",
    },
    HealthTimelineEntry {
        id: "heart-attack-risk",
        minutes_after_quit: 24 * 60,
        title: "হার্ট অ্যাটাকের ঝুঁকি কমা শুরু",
        description: "হার্ট অ্যাটাকের ঝুঁকি কমতে শুরু করে।",
    },
    HealthTimelineEntry {
        id: "taste-smell",
        minutes_after_quit: 48 * 60,
        title: "স্বাদ ও ঘ্রাণ ফিরে আসে",
        description: "স্নায়ুপ্রান্ত পুনরায় গজাতে শুরু করে, স্বাদ ও ঘ্রাণশক্তি বাড়ে।",
    },
    HealthTimelineEntry {
        id: "easier-breathing",
        minutes_after_quit: 72 * 60,
        title: "শ্বাস নেওয়া সহজ",
        description: "শ্বাসনালী শিথিল হয়, শ্বাস নেওয়া সহজ হয়ে আসে।",
    },
    HealthTimelineEntry {
        id: "nicotine-free",
        minutes_after_quit: 7 * 24 * 60,
        title: "নিকোটিনমুক্ত শরীর",
        description: "শরীর থেকে নিকোটিন প্রায় পুরোপুরি বেরিয়ে যায়।",
    },
    HealthTimelineEntry {
        id: "circulation",
        minutes_after_quit: 14 * 24 * 60,
        title: "রক্ত সঞ্চালন উন্নত",
        description: "রক্ত সঞ্চালন উন্নত হয়, হাঁটাচলা সহজ হয়।",
    },
    HealthTimelineEntry {
        id: "lung-function",
        minutes_after_quit: 30 * 24 * 60,
        title: "ফুসফুসের কার্যক্ষমতা বাড়ে",
        description: "ফুসফুসের কার্যক্ষমতা লক্ষণীয়ভাবে বাড়তে থাকে।",
    },
    HealthTimelineEntry {
        id: "lung-recovery",
        minutes_after_quit: 90 * 24 * 60,
        title: "ফুসফুস পরিষ্কার হতে থাকে",
        description: "সিলিয়া পুনরায় সক্রিয় হয়ে ফুসফুস পরিষ্কার করতে থাকে।",
    },
    HealthTimelineEntry {
        id: "less-coughing",
        minutes_after_quit: 270 * 24 * 60,
        title: "কাশি কমে আসে",
        description: "কাশি ও শ্বাসকষ্ট উল্লেখযোগ্যভাবে কমে আসে।",
    },
    HealthTimelineEntry {
        id: "heart-disease-halved",
        minutes_after_quit: 365 * 24 * 60,
        title: "হৃদরোগের ঝুঁকি অর্ধেক",
        description: "করোনারি হৃদরোগের ঝুঁকি ধূমপায়ীর অর্ধেকে নেমে আসে।",
    },
    HealthTimelineEntry {
        id: "stroke-risk",
        minutes_after_quit: 5 * 365 * 24 * 60,
        title: "স্ট্রোকের ঝুঁকি কমে",
        description: "স্ট্রোকের ঝুঁকি অধূমপায়ীর কাছাকাছি নেমে আসে।",
    },
    HealthTimelineEntry {
        id: "lung-cancer-halved",
        minutes_after_quit: 10 * 365 * 24 * 60,
        title: "ফুসফুস ক্যান্সারের ঝুঁকি অর্ধেক",
        description: "ফুসফুস ক্যান্সারে মৃত্যুর ঝুঁকি ধূমপায়ীর অর্ধেক হয়।",
    },
    HealthTimelineEntry {
        id: "heart-disease-normal",
        minutes_after_quit: 15 * 365 * 24 * 60,
        title: "হৃদরোগের ঝুঁকি স্বাভাবিক",
        description: "হৃদরোগের ঝুঁকি অধূমপায়ীর সমান হয়ে যায়।",
    },
];
