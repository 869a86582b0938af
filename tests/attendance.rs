mod common;

use chrono::{Duration, TimeZone, Utc};
use portal_core::service::AttendanceRegister;

#[tokio::test]
async fn double_mark_keeps_the_first_timestamp() {
    let pool = common::test_pool().await;
    let user = common::seed_user(&pool, "amira", None, true).await;
    let register = AttendanceRegister::new(pool);

    let morning = Utc.with_ymd_and_hms(2024, 2, 10, 8, 30, 0).unwrap();
    let afternoon = morning + Duration::hours(6);

    let first = register.mark(user, morning).await.unwrap();
    let second = register.mark(user, afternoon).await.unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.marked_at, morning.timestamp_millis());
    assert_eq!(second.date, morning.date_naive());
}

#[tokio::test]
async fn each_day_gets_its_own_record() {
    let pool = common::test_pool().await;
    let user = common::seed_user(&pool, "amira", None, true).await;
    let register = AttendanceRegister::new(pool);

    let day_one = Utc.with_ymd_and_hms(2024, 2, 10, 8, 30, 0).unwrap();
    let day_two = day_one + Duration::days(1);

    let first = register.mark(user, day_one).await.unwrap();
    let second = register.mark(user, day_two).await.unwrap();
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn listing_is_windowed_and_ordered() {
    let pool = common::test_pool().await;
    let user = common::seed_user(&pool, "amira", None, true).await;
    let register = AttendanceRegister::new(pool);

    for (y, m, d) in [(2024, 2, 20), (2024, 2, 3), (2024, 1, 31), (2024, 3, 1)] {
        let at = Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap();
        register.mark(user, at).await.unwrap();
    }

    let records = register.list_for_month(user, "2024-02").await.unwrap();
    let days: Vec<String> = records.iter().map(|r| r.date.to_string()).collect();
    assert_eq!(days, ["2024-02-03", "2024-02-20"]);
}
