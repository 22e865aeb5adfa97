//! Synthetic demo data
//!
//! Weighted random visitors and page views so the stats and listings have
//! something realistic to show. Families stay longer than other visitors;
//! culture and hiking are the favourite interests.

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use crate::errors::{AppError, Result};
use crate::storage::{
    AgeBracket, AnalyticsStorage, InterestType, PageCategory, StayDuration, VisitorProfile,
    VisitorType,
};

/// 示例页面
const SAMPLE_PAGES: &[(&str, PageCategory)] = &[
    ("Home", PageCategory::Home),
    ("GR20 Hiking", PageCategory::Activities),
    ("Castagniccia Beaches", PageCategory::Nature),
    ("Mountain Hotel", PageCategory::Lodging),
    ("U Castagnu Restaurant", PageCategory::Dining),
    ("Chestnut Museum", PageCategory::Culture),
    ("Chestnut Festival", PageCategory::Events),
    ("Les Pins Campsite", PageCategory::Lodging),
    ("Shepherds' Trail", PageCategory::Activities),
    ("San Pietro Church", PageCategory::Culture),
    ("Local Market", PageCategory::Practical),
    ("Aquatic Centre", PageCategory::Activities),
    ("Monte Padru Viewpoint", PageCategory::Nature),
    ("Casinca Country Cottage", PageCategory::Lodging),
    ("A Castagniccia Pizzeria", PageCategory::Dining),
];

const VISITOR_TYPE_WEIGHTS: &[(VisitorType, u32)] = &[
    (VisitorType::Couple, 35),
    (VisitorType::Family, 45),
    (VisitorType::Solo, 20),
];

const FAMILY_STAY_WEIGHTS: &[(StayDuration, u32)] = &[
    (StayDuration::UnderOneWeek, 30),
    (StayDuration::OneToTwoWeeks, 40),
    (StayDuration::OverOneMonth, 20),
    (StayDuration::OverThreeMonths, 10),
];

const DEFAULT_STAY_WEIGHTS: &[(StayDuration, u32)] = &[
    (StayDuration::UnderOneWeek, 40),
    (StayDuration::OneToTwoWeeks, 35),
    (StayDuration::OverOneMonth, 15),
    (StayDuration::OverThreeMonths, 10),
];

const AGE_WEIGHTS: &[(AgeBracket, u32)] = &[
    (AgeBracket::From18To25, 15),
    (AgeBracket::From26To35, 20),
    (AgeBracket::From36To45, 25),
    (AgeBracket::From46To55, 20),
    (AgeBracket::From56To65, 15),
    (AgeBracket::Over65, 5),
];

const INTEREST_WEIGHTS: &[(InterestType, u32)] = &[
    (InterestType::CultureHeritage, 25),
    (InterestType::Hiking, 30),
    (InterestType::Beach, 20),
    (InterestType::Food, 15),
    (InterestType::Sport, 5),
    (InterestType::Relaxation, 5),
];

/// 一次生成的全部示例数据
#[derive(Debug, Clone)]
pub struct SamplePlan {
    /// (页面名, 分类, 浏览次数)
    pub page_views: Vec<(&'static str, PageCategory, u32)>,
    pub visitors: Vec<VisitorProfile>,
    pub total_views: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub pages: usize,
    pub page_views: u64,
    pub visitors: usize,
    pub total_views: u32,
}

fn pick<R: Rng + ?Sized, T: Copy>(rng: &mut R, weighted: &[(T, u32)]) -> Result<T> {
    weighted
        .choose_weighted(rng, |(_, weight)| *weight)
        .map(|(value, _)| *value)
        .map_err(|e| AppError::validation(format!("invalid sample weights: {}", e)))
}

impl SamplePlan {
    /// 5 到 50 次页面浏览、50 到 100 名访客、200 到 500 次总浏览
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Result<Self> {
        let page_views = SAMPLE_PAGES
            .iter()
            .map(|&(name, category)| (name, category, rng.random_range(5..=50)))
            .collect();

        let visitor_count = rng.random_range(50..=100);
        let mut visitors = Vec::with_capacity(visitor_count);
        for _ in 0..visitor_count {
            let visitor_type = pick(rng, VISITOR_TYPE_WEIGHTS)?;
            let stay_weights = if visitor_type == VisitorType::Family {
                FAMILY_STAY_WEIGHTS
            } else {
                DEFAULT_STAY_WEIGHTS
            };
            visitors.push(VisitorProfile {
                visitor_type,
                stay_duration: pick(rng, stay_weights)?,
                age_bracket: pick(rng, AGE_WEIGHTS)?,
                interest_type: pick(rng, INTEREST_WEIGHTS)?,
            });
        }

        Ok(Self {
            page_views,
            visitors,
            total_views: rng.random_range(200..=500),
        })
    }
}

/// 把示例数据写入存储
pub async fn seed_sample_data(storage: &AnalyticsStorage, plan: &SamplePlan) -> Result<SeedReport> {
    let mut page_views = 0u64;
    for &(name, category, views) in &plan.page_views {
        for _ in 0..views {
            storage.add_page_view(name, category).await?;
        }
        page_views += u64::from(views);
        debug!("Seeded {} views for {} ({})", views, name, category);
    }

    for profile in &plan.visitors {
        storage.add_visitor(profile).await?;
    }

    storage
        .add_total_views(i64::from(plan.total_views))
        .await?;

    let report = SeedReport {
        pages: plan.page_views.len(),
        page_views,
        visitors: plan.visitors.len(),
        total_views: plan.total_views,
    };
    info!("Sample data seeded: {:?}", report);
    Ok(report)
}
