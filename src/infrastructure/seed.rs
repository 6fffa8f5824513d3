use chrono::{Duration, TimeZone, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

use crate::domain::Money;
use crate::models::{article, comment, profile, reel, story, support_ticket};
use crate::services::donation_service::Donator;
use crate::utils::time::format_timestamp;

fn seed_donator(
    id: &str,
    name: &str,
    dollars: i64,
    message: Option<&str>,
    (y, m, d): (i32, u32, u32),
) -> Donator {
    Donator {
        id: id.to_string(),
        name: name.to_string(),
        amount: Money::from_major(dollars),
        message: message.map(str::to_string),
        timestamp: Utc
            .with_ymd_and_hms(y, m, d, 12, 0, 0)
            .single()
            .unwrap_or_default(),
    }
}

/// Example contributions shown alongside real ones on each campaign page
pub fn campaign_seed_donators(campaign: &str) -> Vec<Donator> {
    match campaign {
        "rivera-for-senate" => vec![
            seed_donator("seed-rfs-1", "Maria Gonzalez", 250, Some("For our schools."), (2024, 3, 2)),
            seed_donator("seed-rfs-2", "James Whitaker", 100, None, (2024, 2, 18)),
            seed_donator("seed-rfs-3", "Priya Natarajan", 50, Some("Proud to chip in!"), (2024, 2, 9)),
            seed_donator("seed-rfs-4", "Anonymous", 25, None, (2024, 1, 27)),
        ],
        "measure-12" => vec![
            seed_donator("seed-m12-1", "Friends of the River", 500, Some("Clean water now."), (2024, 4, 11)),
            seed_donator("seed-m12-2", "Tom Okafor", 75, None, (2024, 4, 3)),
            seed_donator("seed-m12-3", "Lena Fischer", 20, Some("Every bit helps"), (2024, 3, 21)),
        ],
        _ => Vec::new(),
    }
}

/// Populate the content tables with a small demo newsroom
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now = Utc::now();

    // 1. Profiles
    let profiles = [
        ("demo-admin", "Dana Admin", "admin"),
        ("demo-author", "Alex Author", "author"),
        ("demo-reader", "Robin Reader", "reader"),
        ("demo-pending", "Pat Pending", "pending_author"),
    ];
    for (id, name, role) in profiles {
        let row = profile::ActiveModel {
            id: Set(id.to_owned()),
            full_name: Set(Some(name.to_owned())),
            role: Set(role.to_owned()),
            created_at: Set(format_timestamp(now - Duration::days(30))),
        };
        profile::Entity::insert(row)
            .on_conflict(OnConflict::column(profile::Column::Id).do_nothing().to_owned())
            .exec_without_returning(db)
            .await?;
    }

    // 2. Articles, spread over the last week
    let articles = [
        ("demo-article-1", "City council passes transit budget", Some("Politics"), 420),
        ("demo-article-2", "Local team clinches playoff spot", Some("Sports"), 310),
        ("demo-article-3", "New clinic opens downtown", Some("Health"), 95),
        ("demo-article-4", "Opinion: fix the potholes first", None, 57),
        ("demo-article-5", "Startup week draws record crowd", Some("Business"), 128),
    ];
    for (i, (id, title, category, views)) in articles.into_iter().enumerate() {
        let row = article::ActiveModel {
            id: Set(id.to_owned()),
            title: Set(title.to_owned()),
            content: Set(Some(format!("{} (demo content)", title))),
            category: Set(category.map(str::to_owned)),
            views: Set(views),
            status: Set("published".to_owned()),
            author_id: Set(Some("demo-author".to_owned())),
            created_at: Set(format_timestamp(now - Duration::days(i as i64))),
        };
        article::Entity::insert(row)
            .on_conflict(OnConflict::column(article::Column::Id).do_nothing().to_owned())
            .exec_without_returning(db)
            .await?;
    }

    // 3. Comments
    let comments = [
        ("demo-comment-1", "demo-article-1", "About time."),
        ("demo-comment-2", "demo-article-1", "What about the bike lanes?"),
        ("demo-comment-3", "demo-article-2", "Go team!"),
    ];
    for (i, (id, article_id, content)) in comments.into_iter().enumerate() {
        let row = comment::ActiveModel {
            id: Set(id.to_owned()),
            article_id: Set(article_id.to_owned()),
            user_id: Set(Some("demo-reader".to_owned())),
            content: Set(content.to_owned()),
            created_at: Set(format_timestamp(now - Duration::hours(3 * i as i64))),
        };
        comment::Entity::insert(row)
            .on_conflict(OnConflict::column(comment::Column::Id).do_nothing().to_owned())
            .exec_without_returning(db)
            .await?;
    }

    // 4. One of each remaining content type
    reel::Entity::insert(reel::ActiveModel {
        id: Set("demo-reel-1".to_owned()),
        title: Set("Sixty seconds at the farmers market".to_owned()),
        video_url: Set("https://cdn.veritus.news/reels/demo-1.mp4".to_owned()),
        author_id: Set(Some("demo-author".to_owned())),
        created_at: Set(format_timestamp(now)),
    })
    .on_conflict(OnConflict::column(reel::Column::Id).do_nothing().to_owned())
    .exec_without_returning(db)
    .await?;

    story::Entity::insert(story::ActiveModel {
        id: Set("demo-story-1".to_owned()),
        title: Set("Election night live".to_owned()),
        media_url: Set("https://cdn.veritus.news/stories/demo-1.jpg".to_owned()),
        author_id: Set(Some("demo-author".to_owned())),
        expires_at: Set(Some(format_timestamp(now + Duration::hours(24)))),
        created_at: Set(format_timestamp(now)),
    })
    .on_conflict(OnConflict::column(story::Column::Id).do_nothing().to_owned())
    .exec_without_returning(db)
    .await?;

    support_ticket::Entity::insert(support_ticket::ActiveModel {
        id: Set("demo-ticket-1".to_owned()),
        user_id: Set(Some("demo-reader".to_owned())),
        subject: Set("Cannot reset password".to_owned()),
        message: Set("The reset email never arrives.".to_owned()),
        status: Set("open".to_owned()),
        created_at: Set(format_timestamp(now)),
    })
    .on_conflict(OnConflict::column(support_ticket::Column::Id).do_nothing().to_owned())
    .exec_without_returning(db)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_donators_are_positive_and_unique() {
        for campaign in ["rivera-for-senate", "measure-12"] {
            let seed = campaign_seed_donators(campaign);
            assert!(!seed.is_empty());
            assert!(seed.iter().all(|d| d.amount.is_positive()));
            let mut ids: Vec<_> = seed.iter().map(|d| d.id.as_str()).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), seed.len());
        }
        assert!(campaign_seed_donators("unknown").is_empty());
    }
}
