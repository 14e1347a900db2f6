use std::collections::BTreeMap;

use anyhow::Context;
use chrono::NaiveDate;
use spectral::assert_that;

use panscrape::aggregate::{FetchPolicy, SourceInfo, SourceParams, crawl_range};
use panscrape::extract::Patterns;

fn day(year: i32, month: u32, day_of_month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day_of_month).expect("valid test date")
}

fn source() -> SourceInfo {
    SourceInfo {
        site: "drikpanchang.com".to_string(),
        base_url: "https://www.drikpanchang.com/panchang/month-panchang.html".to_string(),
        params: SourceParams {
            geoname_id: None,
            time_format: "24hour".to_string(),
        },
    }
}

#[tokio::test]
async fn two_day_walk_builds_monthly_indices() {
    let pages = BTreeMap::from([
        (
            "2025-01-14".to_string(),
            "The festival of Makara Sankranti is celebrated. Festival Pongal".to_string(),
        ),
        ("2025-01-15".to_string(), "Festival Pongal".to_string()),
    ]);

    let patterns = Patterns::default();
    let pages_ref = &pages;
    let aggregate = crawl_range(
        day(2025, 1, 14),
        day(2025, 1, 15),
        FetchPolicy::Abort,
        &patterns,
        |date| async move {
            pages_ref
                .get(&date.format("%Y-%m-%d").to_string())
                .cloned()
                .context("missing page")
        },
    )
    .await
    .expect("walk should succeed");

    assert_that(&aggregate.daily.len()).is_equal_to(2_usize);

    let first_label = "January 14, 2025, Tuesday".to_string();
    let january = aggregate
        .festivals_by_month
        .get("2025")
        .and_then(|months| months.get("January"))
        .expect("January festival index");
    assert_that(&january.len()).is_equal_to(2_usize);
    assert_that(&january.get("Makara Sankranti")).is_equal_to(Some(&first_label));
    // Pongal appears on both days; the first day's label wins.
    assert_that(&january.get("Pongal")).is_equal_to(Some(&first_label));

    let observances = aggregate
        .observances_by_month
        .get("2025")
        .and_then(|months| months.get("January"))
        .expect("January observance index");
    assert_that(&observances.len()).is_equal_to(1_usize);
    assert_that(&observances.get("Makara Sankranti")).is_equal_to(Some(&first_label));
}

#[tokio::test]
async fn observance_index_is_a_subset_of_the_festival_index() {
    let patterns = Patterns::default();
    let aggregate = crawl_range(
        day(2025, 1, 14),
        day(2025, 1, 16),
        FetchPolicy::Abort,
        &patterns,
        |date| async move {
            Ok(match date.format("%Y-%m-%d").to_string().as_str() {
                "2025-01-14" => "celebrated as Makara Sankranti and Festival Pongal".to_string(),
                "2025-01-15" => "observed as Shattila Ekadashi".to_string(),
                _ => "Sunrise 06:42 AM Sunset 05:50 PM".to_string(),
            })
        },
    )
    .await
    .expect("walk should succeed");

    for (year, months) in &aggregate.observances_by_month {
        for (month, names) in months {
            for (name, label) in names {
                let mirrored = aggregate
                    .festivals_by_month
                    .get(year)
                    .and_then(|entry| entry.get(month))
                    .and_then(|entry| entry.get(name));
                assert_that(&mirrored).is_equal_to(Some(label));
            }
        }
    }
}

#[tokio::test]
async fn festival_free_month_is_still_indexed() {
    let patterns = Patterns::default();
    let aggregate = crawl_range(
        day(2025, 2, 1),
        day(2025, 2, 1),
        FetchPolicy::Abort,
        &patterns,
        |_| async move { Ok("Sunrise 06:58 AM Sunset 06:05 PM".to_string()) },
    )
    .await
    .expect("walk should succeed");

    let february = aggregate
        .festivals_by_month
        .get("2025")
        .and_then(|months| months.get("February"))
        .map(BTreeMap::len);
    assert_that(&february).is_equal_to(Some(0_usize));
}

#[tokio::test]
async fn abort_policy_fails_the_walk_on_fetch_error() {
    let patterns = Patterns::default();
    let result = crawl_range(
        day(2025, 1, 14),
        day(2025, 1, 15),
        FetchPolicy::Abort,
        &patterns,
        |date| async move {
            if date == day(2025, 1, 14) {
                Ok("Festival Pongal".to_string())
            } else {
                anyhow::bail!("connection reset")
            }
        },
    )
    .await;

    assert_that(&result.is_err()).is_equal_to(true);
}

#[tokio::test]
async fn skip_policy_continues_past_fetch_errors() {
    let patterns = Patterns::default();
    let aggregate = crawl_range(
        day(2025, 1, 14),
        day(2025, 1, 15),
        FetchPolicy::Skip,
        &patterns,
        |date| async move {
            if date == day(2025, 1, 14) {
                Ok("Festival Pongal".to_string())
            } else {
                anyhow::bail!("connection reset")
            }
        },
    )
    .await
    .expect("skip walk should succeed");

    assert_that(&aggregate.daily.len()).is_equal_to(1_usize);
    assert_that(&aggregate.daily.contains_key("2025-01-14")).is_equal_to(true);
}

async fn walk_and_serialize() -> String {
    let patterns = Patterns::default();
    let aggregate = crawl_range(
        day(2025, 1, 14),
        day(2025, 1, 15),
        FetchPolicy::Abort,
        &patterns,
        |date| async move {
            Ok(if date == day(2025, 1, 14) {
                "The festival of Makara Sankranti is celebrated".to_string()
            } else {
                "Sunrise 06:42 AM Sunset 05:50 PM".to_string()
            })
        },
    )
    .await
    .expect("walk should succeed");

    serde_json::to_string(&aggregate.into_result(source())).expect("serializable aggregate")
}

#[tokio::test]
async fn identical_walks_serialize_identically() {
    let first = walk_and_serialize().await;
    let second = walk_and_serialize().await;
    assert_that(&first).is_equal_to(&second);
}

#[tokio::test]
async fn aggregate_result_exposes_the_expected_views() {
    let json: serde_json::Value =
        serde_json::from_str(&walk_and_serialize().await).expect("valid JSON");

    for view in [
        "source",
        "festivals_by_month",
        "daily_panchang",
        "observances_by_month",
        "everything",
    ] {
        assert_that(&json.get(view).is_some()).is_equal_to(true);
    }

    let years = json
        .get("everything")
        .and_then(|everything| everything.get("years"))
        .cloned();
    assert_that(&years).is_equal_to(Some(serde_json::json!(["2025"])));

    let record = json
        .get("daily_panchang")
        .and_then(|daily| daily.get("2025-01-15"))
        .cloned()
        .expect("day record present");
    assert_that(&record.get("weekday").cloned()).is_equal_to(Some(serde_json::json!("Wednesday")));
    let sunrise = record
        .get("timings")
        .and_then(|timings| timings.get("sunrise"))
        .cloned();
    assert_that(&sunrise).is_equal_to(Some(serde_json::json!("06:42 AM")));
}
