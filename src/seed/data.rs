//! Embedded seed dataset
//!
//! The initial content for a fresh deployment: six categories, ten
//! tags, five sample news items with tag attachments, approved sample
//! comments, typed settings and a week of per-item daily stats.

use chrono::{Duration, Utc};

use crate::models::{
    CreateCategoryInput, CreateCommentInput, CreateNewsItemInput, CreateTagInput, DailyMetrics,
    SettingType,
};

/// News item seed entry: the item plus its category and tag references
/// by natural key
pub struct SeedNewsItem {
    pub input: CreateNewsItemInput,
    pub category_name: &'static str,
    pub tag_names: &'static [&'static str],
}

/// Comment seed entry, referencing its item by slug
pub struct SeedComment {
    pub slug: &'static str,
    pub user_name: &'static str,
    pub user_email: &'static str,
    pub content: &'static str,
}

/// Setting seed entry with full metadata
pub struct SeedSetting {
    pub key: &'static str,
    pub value: &'static str,
    pub value_type: SettingType,
    pub description: &'static str,
    pub category: &'static str,
    pub is_public: bool,
}

/// Number of days of historical stats to seed
pub const STATS_DAYS: i64 = 7;

pub fn categories() -> Vec<CreateCategoryInput> {
    let rows: [(&str, &str, &str, &str); 6] = [
        ("أخبار البرلمان", "Parliament News", "🏛️", "#1E4B8F"),
        ("أخبار اقتصادية", "Economic News", "💰", "#2E8B57"),
        ("أخبار اجتماعية", "Social News", "👥", "#C46210"),
        ("أخبار محلية", "Local News", "🏘️", "#6A5ACD"),
        ("أخبار قانونية", "Legal News", "⚖️", "#8B0000"),
        ("أخبار عامة", "General News", "📰", "#555555"),
    ];

    rows.iter()
        .enumerate()
        .map(|(i, (name, name_en, icon, color))| CreateCategoryInput {
            name: name.to_string(),
            name_en: Some(name_en.to_string()),
            description: None,
            description_en: None,
            icon: Some(icon.to_string()),
            color: Some(color.to_string()),
            display_order: (i + 1) as i32,
        })
        .collect()
}

pub fn tags() -> Vec<CreateTagInput> {
    let rows: [(&str, &str); 10] = [
        ("عاجل", "Breaking"),
        ("مهم", "Important"),
        ("تحديث", "Update"),
        ("تحليل", "Analysis"),
        ("مقابلة", "Interview"),
        ("تقرير", "Report"),
        ("إعلان", "Announcement"),
        ("فعالية", "Event"),
        ("قانون", "Law"),
        ("انتخابات", "Elections"),
    ];

    rows.iter()
        .map(|(name, name_en)| CreateTagInput {
            name: name.to_string(),
            name_en: Some(name_en.to_string()),
            description: None,
            color: None,
        })
        .collect()
}

pub fn news_items() -> Vec<SeedNewsItem> {
    let now = Utc::now();

    vec![
        SeedNewsItem {
            input: {
                let mut input = CreateNewsItemInput::new(
                    "مجلس النواب يناقش قانون التعليم الجديد".to_string(),
                    "parliament-education-law-discussion".to_string(),
                    "جلسة برلمانية مخصصة لمناقشة تعديلات قانون التعليم".to_string(),
                    "ناقش مجلس النواب في جلسته العامة اليوم التعديلات المقترحة على قانون \
                     التعليم، بحضور وزير التربية والتعليم وعدد من الخبراء. وتركزت المناقشات \
                     حول تطوير المناهج وتحسين أوضاع المعلمين."
                        .to_string(),
                    0,
                )
                .with_featured(true)
                .with_priority(5)
                .with_published_at(now - Duration::hours(6))
                .with_author_name("محرر الشؤون البرلمانية".to_string());
                input.view_count = 1250;
                input.like_count = 89;
                input.share_count = 34;
                input
            },
            category_name: "أخبار البرلمان",
            tag_names: &["مهم", "قانون"],
        },
        SeedNewsItem {
            input: {
                let mut input = CreateNewsItemInput::new(
                    "النائبة سارة أحمد تطلق مبادرة لدعم المرأة العاملة".to_string(),
                    "sara-ahmed-working-women-initiative".to_string(),
                    "مبادرة جديدة لتوفير حضانات بأسعار رمزية في أماكن العمل".to_string(),
                    "أعلنت النائبة سارة أحمد عن إطلاق مبادرة لدعم المرأة العاملة تشمل توفير \
                     حضانات بأسعار رمزية داخل المنشآت الكبرى، بالتعاون مع وزارة التضامن \
                     الاجتماعي وعدد من منظمات المجتمع المدني."
                        .to_string(),
                    0,
                )
                .with_priority(3)
                .with_published_at(now - Duration::hours(12))
                .with_author_name("محرر الشؤون الاجتماعية".to_string());
                input.view_count = 640;
                input.like_count = 52;
                input.share_count = 18;
                input
            },
            category_name: "أخبار اجتماعية",
            tag_names: &["إعلان", "فعالية"],
        },
        SeedNewsItem {
            input: {
                let mut input = CreateNewsItemInput::new(
                    "اجتماع طارئ للجنة الاقتصادية لبحث ارتفاع الأسعار".to_string(),
                    "emergency-economic-committee-meeting".to_string(),
                    "اللجنة الاقتصادية تعقد اجتماعاً طارئاً لمناقشة موجة ارتفاع الأسعار".to_string(),
                    "عقدت اللجنة الاقتصادية بمجلس النواب اجتماعاً طارئاً مساء اليوم لبحث \
                     موجة ارتفاع الأسعار الأخيرة، واستدعت ممثلين عن وزارة التموين وجهاز \
                     حماية المستهلك لعرض إجراءات ضبط الأسواق."
                        .to_string(),
                    0,
                )
                .with_featured(true)
                .with_breaking(true)
                .with_priority(10)
                .with_published_at(now - Duration::minutes(30))
                .with_author_name("محرر الشؤون الاقتصادية".to_string());
                input.view_count = 2100;
                input.like_count = 143;
                input.share_count = 77;
                input
            },
            category_name: "أخبار اقتصادية",
            tag_names: &["عاجل", "مهم", "تقرير"],
        },
        SeedNewsItem {
            input: {
                let mut input = CreateNewsItemInput::new(
                    "بدء تنفيذ مشروع تطوير الطرق في القاهرة الكبرى".to_string(),
                    "cairo-road-development-project".to_string(),
                    "انطلاق أعمال المرحلة الأولى من مشروع تطوير شبكة الطرق".to_string(),
                    "بدأت اليوم أعمال المرحلة الأولى من مشروع تطوير شبكة الطرق في القاهرة \
                     الكبرى، والذي يشمل رصف وتوسعة عدد من المحاور الرئيسية وتركيب إشارات \
                     مرورية ذكية، على أن تكتمل الأعمال خلال ثمانية عشر شهراً."
                        .to_string(),
                    0,
                )
                .with_priority(2)
                .with_published_at(now - Duration::hours(24))
                .with_author_name("محرر الشؤون المحلية".to_string());
                input.view_count = 430;
                input.like_count = 21;
                input.share_count = 9;
                input
            },
            category_name: "أخبار محلية",
            tag_names: &["تحديث", "تقرير"],
        },
        SeedNewsItem {
            input: {
                let mut input = CreateNewsItemInput::new(
                    "وزير الصحة يعلن خطة تطوير المستشفيات الحكومية".to_string(),
                    "health-minister-hospital-development".to_string(),
                    "خطة شاملة لتطوير المستشفيات الحكومية خلال ثلاث سنوات".to_string(),
                    "أعلن وزير الصحة أمام البرلمان عن خطة شاملة لتطوير المستشفيات الحكومية \
                     خلال السنوات الثلاث المقبلة، تتضمن رفع كفاءة أقسام الطوارئ وزيادة \
                     الأسرّة وتدريب الكوادر الطبية، في إطار مشروع التأمين الصحي الشامل."
                        .to_string(),
                    0,
                )
                .with_priority(4)
                .with_published_at(now - Duration::hours(18))
                .with_author_name("محرر الشؤون العامة".to_string());
                input.view_count = 880;
                input.like_count = 67;
                input.share_count = 25;
                input
            },
            category_name: "أخبار عامة",
            tag_names: &["مقابلة", "تحليل"],
        },
    ]
}

pub fn comments() -> Vec<SeedComment> {
    vec![
        SeedComment {
            slug: "parliament-education-law-discussion",
            user_name: "محمد عبد الله",
            user_email: "mohamed.abdallah@example.com",
            content: "خطوة ممتازة، نتمنى أن يشمل القانون تحسين رواتب المعلمين فعلاً.",
        },
        SeedComment {
            slug: "parliament-education-law-discussion",
            user_name: "هدى السيد",
            user_email: "hoda.elsayed@example.com",
            content: "المناهج تحتاج تطويراً جذرياً وليس تعديلات شكلية.",
        },
        SeedComment {
            slug: "sara-ahmed-working-women-initiative",
            user_name: "منى حسن",
            user_email: "mona.hassan@example.com",
            content: "مبادرة رائعة، الحضانات داخل أماكن العمل مطلب قديم لكل أم عاملة.",
        },
        SeedComment {
            slug: "emergency-economic-committee-meeting",
            user_name: "أحمد فاروق",
            user_email: "ahmed.farouk@example.com",
            content: "نريد إجراءات حقيقية لضبط الأسواق وليس مجرد اجتماعات.",
        },
        SeedComment {
            slug: "health-minister-hospital-development",
            user_name: "خالد إبراهيم",
            user_email: "khaled.ibrahim@example.com",
            content: "أتمنى أن تصل الخطة إلى مستشفيات الصعيد وليس العاصمة فقط.",
        },
    ]
}

pub fn settings() -> Vec<SeedSetting> {
    vec![
        SeedSetting {
            key: "site_name",
            value: "نائبك - أخبار",
            value_type: SettingType::String,
            description: "اسم الموقع",
            category: "display",
            is_public: true,
        },
        SeedSetting {
            key: "news_per_page",
            value: "10",
            value_type: SettingType::Integer,
            description: "عدد الأخبار في الصفحة",
            category: "display",
            is_public: false,
        },
        SeedSetting {
            key: "enable_comments",
            value: "true",
            value_type: SettingType::Boolean,
            description: "السماح بالتعليقات",
            category: "interaction",
            is_public: false,
        },
        SeedSetting {
            key: "auto_approve_comments",
            value: "false",
            value_type: SettingType::Boolean,
            description: "الموافقة التلقائية على التعليقات",
            category: "interaction",
            is_public: false,
        },
        SeedSetting {
            key: "breaking_news_ttl_hours",
            value: "24",
            value_type: SettingType::Integer,
            description: "مدة بقاء الخبر العاجل بالساعات",
            category: "content",
            is_public: false,
        },
        SeedSetting {
            key: "featured_news_limit",
            value: "5",
            value_type: SettingType::Integer,
            description: "الحد الأقصى للأخبار المميزة",
            category: "content",
            is_public: false,
        },
        SeedSetting {
            key: "contact_email",
            value: "news@naebak.com",
            value_type: SettingType::String,
            description: "البريد الإلكتروني للتواصل",
            category: "contact",
            is_public: true,
        },
        SeedSetting {
            key: "social_links",
            value: r#"{"facebook": "naebak", "twitter": "@naebak"}"#,
            value_type: SettingType::Json,
            description: "روابط التواصل الاجتماعي",
            category: "contact",
            is_public: true,
        },
        SeedSetting {
            key: "maintenance_mode",
            value: "false",
            value_type: SettingType::Boolean,
            description: "وضع الصيانة",
            category: "system",
            is_public: false,
        },
        SeedSetting {
            key: "archive_after_days",
            value: "90",
            value_type: SettingType::Integer,
            description: "أرشفة الأخبار بعد عدد أيام",
            category: "system",
            is_public: false,
        },
    ]
}

/// Synthetic daily metrics for seeded history.
///
/// `days_ago` runs 0..STATS_DAYS; `ordinal` is the 1-based position of
/// the item in the seed list. Older days trend lower, bigger ordinals
/// trend higher, floors keep everything plausible.
pub fn daily_metrics(days_ago: i64, ordinal: i64) -> DailyMetrics {
    DailyMetrics {
        views: (200 - days_ago * 20 + ordinal * 10).max(50),
        unique_views: (150 - days_ago * 15 + ordinal * 8).max(30),
        likes: (20 - days_ago * 2 + ordinal).max(5),
        shares: (10 - days_ago + ordinal).max(2),
        comments: (5 - days_ago + ordinal / 2).max(1),
        avg_read_time: (120 + ordinal * 30) as f64,
        bounce_rate: 0.3 + days_ago as f64 * 0.05,
        engagement_rate: (0.15 - days_ago as f64 * 0.02).max(0.01),
        direct_visits: (50 - days_ago * 5 + ordinal).max(10),
        social_visits: (30 - days_ago * 3 + ordinal).max(5),
        search_visits: (40 - days_ago * 4 + ordinal).max(8),
        referral_visits: (15 - days_ago * 2 + ordinal).max(3),
    }
}
