use caption_server::entity::ad_event;
use futures::future::join_all;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::common::{TestApp, TestOptions, routes};

#[tokio::test]
async fn starting_an_ad_without_active_platform_fails() {
    let app = TestApp::spawn().await;
    let device = app.register_device().await;

    let res = app.post_as_device(routes::ADS, &device).await;

    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "NO_ACTIVE_PLATFORM");
}

#[tokio::test]
async fn ad_comes_from_the_lowest_priority_number() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    app.create_platform(&admin, "AppLovin", 3, 1, 9).await;
    app.create_platform(&admin, "start.io", 1, 1, 2).await;
    let device = app.register_device().await;

    let res = app.post_as_device(routes::ADS, &device).await;

    assert_eq!(res.status, 201);
    assert_eq!(res.body["platform"], "start.io");
    assert_eq!(res.body["coins"], 2);
}

#[tokio::test]
async fn completing_early_reports_remaining_time() {
    let app = TestApp::spawn_with(TestOptions {
        countdown_secs: 30,
        ..Default::default()
    })
    .await;
    let admin = app.admin_token().await;
    app.create_platform(&admin, "Unity Ads", 1, 1, 3).await;
    let device = app.register_device().await;

    let id = app.start_ad(&device).await;
    let poll = app.get_as_device(&routes::ad(&id), &device).await;
    assert_eq!(poll.status, 200);
    assert_eq!(poll.body["state"], "playing");

    let res = app.post_as_device(&routes::ad_complete(&id), &device).await;

    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "AD_STILL_PLAYING");
    let retry_after: u64 = res.headers["retry-after"]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=30).contains(&retry_after));

    let me = app.get_as_device(routes::ME, &device).await;
    assert_eq!(me.body["coins"], 0);
}

#[tokio::test]
async fn finished_ad_credits_coins_and_records_an_event() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    app.create_platform(&admin, "Unity Ads", 1, 1, 3).await;
    let device = app.register_device().await;

    let res = app.watch_ad(&device).await;

    assert_eq!(res.body["message"], "Earned 3 coins!");
    assert_eq!(res.body["coins_earned"], 3);
    assert_eq!(res.body["coins"], 3);
    assert_eq!(res.body["ads_watched"], 1);
    assert_eq!(ad_event::Entity::find().count(&app.db).await.unwrap(), 1);
}

#[tokio::test]
async fn a_playback_pays_out_once() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    app.create_platform(&admin, "Unity Ads", 1, 1, 3).await;
    let device = app.register_device().await;

    let id = app.start_ad(&device).await;
    let first = app.post_as_device(&routes::ad_complete(&id), &device).await;
    assert_eq!(first.status, 200);

    let second = app.post_as_device(&routes::ad_complete(&id), &device).await;

    assert_eq!(second.status, 404);
    let me = app.get_as_device(routes::ME, &device).await;
    assert_eq!(me.body["coins"], 3);
}

#[tokio::test]
async fn another_device_cannot_claim_the_reward() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    app.create_platform(&admin, "Unity Ads", 1, 1, 3).await;
    let owner = app.register_device().await;
    let thief = app.register_device().await;

    let id = app.start_ad(&owner).await;
    let res = app.post_as_device(&routes::ad_complete(&id), &thief).await;

    assert_eq!(res.status, 404);
    let owner_res = app.post_as_device(&routes::ad_complete(&id), &owner).await;
    assert_eq!(owner_res.status, 200);
}

#[tokio::test]
async fn rewards_accumulate_over_sequential_ads() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    app.create_platform(&admin, "Google AdMob", 1, 1, 4).await;
    let device = app.register_device().await;

    for _ in 0..5 {
        app.watch_ad(&device).await;
    }

    let me = app.get_as_device(routes::ME, &device).await;
    assert_eq!(me.body["coins"], 20);
    assert_eq!(me.body["ads_watched"], 5);
    let user_id = me.body["id"].as_i64().unwrap() as i32;
    let events = ad_event::Entity::find()
        .filter(ad_event::Column::UserId.eq(user_id))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(events, 5);
}

#[tokio::test]
async fn concurrent_completions_lose_no_reward() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    app.create_platform(&admin, "Unity Ads", 1, 1, 3).await;
    let device = app.register_device().await;

    let mut ids = Vec::new();
    for _ in 0..6 {
        ids.push(app.start_ad(&device).await);
    }

    let paths: Vec<String> = ids.iter().map(|id| routes::ad_complete(id)).collect();
    let results = join_all(
        paths
            .iter()
            .map(|path| app.post_as_device(path, &device)),
    )
    .await;

    for res in &results {
        assert_eq!(res.status, 200, "{}", res.text);
    }
    let me = app.get_as_device(routes::ME, &device).await;
    assert_eq!(me.body["coins"], 18);
    assert_eq!(me.body["ads_watched"], 6);
}
