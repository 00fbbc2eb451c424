//! Integration test walking every page of a listing through the public API

#[cfg(feature = "mocks")]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use market_backend_lib::{
        data::market_db::{client::DBClient, mock_repository::MockRepository},
        models::{ArticleOrder, ProductOrder},
        pagination::PageLimits,
        services::Services,
    };
    use market_db::{Article, Product};

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    async fn seed_articles(repo: &MockRepository, count: i64) {
        for id in 1..=count {
            // groups of three share a timestamp to exercise the id tiebreaker
            let created_at = base() + Duration::minutes(id / 3);
            repo.insert_article(Article {
                id,
                title: format!("Article {id}"),
                content: if id % 2 == 0 { "even" } else { "odd" }.to_string(),
                created_at,
                updated_at: created_at,
            })
            .await;
        }
    }

    async fn walk_articles(
        services: &Services,
        limit: i64,
        keyword: Option<&str>,
        order: ArticleOrder,
    ) -> Vec<i64> {
        let mut seen = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = services
                .articles
                .list(cursor.as_deref(), limit, keyword.map(str::to_string), order)
                .await
                .unwrap();
            assert!(page.data.len() as i64 <= limit);
            assert_eq!(page.has_next, page.next_token.is_some());
            seen.extend(page.data.iter().map(|a| a.id.parse::<i64>().unwrap()));
            match page.next_token {
                Some(token) => cursor = Some(token),
                None => break,
            }
        }
        seen
    }

    #[tokio::test]
    async fn every_record_exactly_once_for_any_page_size() {
        let repo = Arc::new(MockRepository::new());
        seed_articles(&repo, 23).await;
        let services = Services::new(DBClient::new(repo, PageLimits::default()), 10);

        let expected_recent = walk_articles(&services, 100, None, ArticleOrder::Recent).await;
        assert_eq!(expected_recent.len(), 23);

        for limit in [1, 2, 3, 5, 7, 22, 23, 24] {
            let recent = walk_articles(&services, limit, None, ArticleOrder::Recent).await;
            assert_eq!(recent, expected_recent, "limit {limit}");

            let oldest = walk_articles(&services, limit, None, ArticleOrder::Oldest).await;
            assert_eq!(oldest.len(), 23, "limit {limit}");
            assert_eq!(oldest.iter().collect::<HashSet<_>>().len(), 23);
            // ascending time with ascending ids inside ties is plain id order here
            assert_eq!(oldest, (1..=23).collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    async fn keyword_filter_composes_with_cursor() {
        let repo = Arc::new(MockRepository::new());
        seed_articles(&repo, 20).await;
        let services = Services::new(DBClient::new(repo, PageLimits::default()), 10);

        let even = walk_articles(&services, 3, Some("even"), ArticleOrder::Oldest).await;
        assert_eq!(even, (1..=10).map(|n| n * 2).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn inserts_between_pages_do_not_shift_the_walk() {
        let repo = Arc::new(MockRepository::new());
        seed_articles(&repo, 6).await;
        let services =
            Services::new(DBClient::new(repo.clone(), PageLimits::default()), 10);

        let first = services
            .articles
            .list(None, 3, None, ArticleOrder::Recent)
            .await
            .unwrap();
        let first_ids: Vec<_> = first.data.iter().map(|a| a.id.clone()).collect();

        // a newer article lands before the cursor and must not appear later
        let newest = base() + Duration::days(1);
        repo.insert_article(Article {
            id: 100,
            title: "Breaking".to_string(),
            content: "news".to_string(),
            created_at: newest,
            updated_at: newest,
        })
        .await;

        let second = services
            .articles
            .list(first.next_token.as_deref(), 3, None, ArticleOrder::Recent)
            .await
            .unwrap();
        let second_ids: Vec<_> = second.data.iter().map(|a| a.id.clone()).collect();

        assert_eq!(first_ids.len() + second_ids.len(), 6);
        assert!(!second_ids.contains(&"100".to_string()));
        assert!(first_ids.iter().all(|id| !second_ids.contains(id)));
        assert!(!second.has_next);
    }

    #[tokio::test]
    async fn equal_prices_are_ordered_by_id() {
        let repo = Arc::new(MockRepository::new());
        for id in 1..=9 {
            repo.insert_product(Product {
                id,
                name: format!("Product {id}"),
                description: String::new(),
                price: 100 * (id % 3),
                tags: vec![],
                created_at: base(),
                updated_at: base(),
            })
            .await;
        }
        let services = Services::new(DBClient::new(repo, PageLimits::default()), 10);

        let mut seen = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = services
                .products
                .list(cursor.as_deref(), 2, None, ProductOrder::PriceDesc)
                .await
                .unwrap();
            seen.extend(page.data.into_iter().map(|p| (p.price, p.id)));
            cursor = page.next_token;
            if cursor.is_none() {
                break;
            }
        }

        let expected: Vec<(i64, String)> = [2, 5, 8, 1, 4, 7, 3, 6, 9]
            .into_iter()
            .map(|id: i64| (100 * (id % 3), id.to_string()))
            .collect();
        assert_eq!(seen, expected);
    }
}
