use std::io::{Cursor, Read};

use futures::future::join_all;
use serde_json::json;

use crate::common::{ADMIN_PASSWORD, TestApp, routes};

mod auth {
    use super::*;

    #[tokio::test]
    async fn correct_password_yields_a_token() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::ADMIN_LOGIN, &json!({"password": ADMIN_PASSWORD}))
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["token"].is_string());
        assert!(res.body["expires_at"].as_i64().unwrap() > chrono::Utc::now().timestamp());
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::ADMIN_LOGIN, &json!({"password": "admin123"}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
        assert_eq!(res.body["message"], "Unauthorized access");
    }

    #[tokio::test]
    async fn dashboard_requires_a_token() {
        let app = TestApp::spawn().await;

        let missing = app.get(routes::ANALYTICS).await;
        assert_eq!(missing.status, 401);
        assert_eq!(missing.body["code"], "TOKEN_MISSING");

        let invalid = app.get_with_token(routes::ANALYTICS, "not.a.jwt").await;
        assert_eq!(invalid.status, 401);
        assert_eq!(invalid.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn device_token_does_not_open_the_dashboard() {
        let app = TestApp::spawn().await;
        let device = app.register_device().await;

        let res = app.get_with_token(routes::USERS, &device).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}

mod analytics {
    use super::*;

    #[tokio::test]
    async fn analytics_summarize_users_captions_and_ads() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        app.create_platform(&admin, "Unity Ads", 1, 1, 3).await;
        let device = app.register_device().await;
        app.register_device().await;
        app.caption_ok(&device).await;
        app.watch_ad(&device).await;
        app.watch_ad(&device).await;

        let res = app.get_with_token(routes::ANALYTICS, &admin).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["total_users"], 2);
        assert_eq!(res.body["active_today"], 2);
        assert_eq!(res.body["total_captions"], 1);
        assert_eq!(res.body["total_ads_watched"], 2);

        let growth = res.body["user_growth"].as_array().unwrap();
        assert_eq!(growth.len(), 1);
        assert_eq!(growth[0]["new_users"], 2);
        assert_eq!(
            growth[0]["date"],
            chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
        );

        let revenue = res.body["ad_revenue"].as_array().unwrap();
        assert_eq!(revenue.len(), 1);
        assert_eq!(revenue[0]["platform_name"], "Unity Ads");
        assert_eq!(revenue[0]["ad_count"], 2);
        assert!((revenue[0]["revenue"].as_f64().unwrap() - 0.08).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_store_reports_zeroes() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let res = app.get_with_token(routes::ANALYTICS, &admin).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["total_users"], 0);
        assert_eq!(res.body["total_ads_watched"], 0);
        assert!(res.body["user_growth"].as_array().unwrap().is_empty());
    }
}

mod platforms {
    use super::*;

    #[tokio::test]
    async fn catalog_lists_the_known_networks() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let res = app.get_with_token(routes::PLATFORM_CATALOG, &admin).await;

        assert_eq!(res.status, 200);
        let names: Vec<_> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["start.io", "Google AdMob", "Unity Ads", "AppLovin"]);
    }

    #[tokio::test]
    async fn platforms_are_listed_by_priority_with_masked_keys() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        app.create_platform(&admin, "AppLovin", 4, 1, 3).await;
        app.create_platform(&admin, "Unity Ads", 2, 1, 3).await;

        let res = app.get_with_token(routes::PLATFORMS, &admin).await;

        assert_eq!(res.status, 200);
        let list = res.body.as_array().unwrap();
        assert_eq!(list[0]["platform_name"], "Unity Ads");
        assert_eq!(list[1]["platform_name"], "AppLovin");
        let key = list[0]["api_key"].as_str().unwrap();
        assert!(key.ends_with("6789"));
        assert!(!key.contains("pk_test"));
    }

    #[tokio::test]
    async fn platform_outside_the_catalog_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::PLATFORMS,
                &json!({
                    "platform_name": "Acme Ads",
                    "api_key": "k",
                    "priority": 1,
                    "ads_per_use": 1,
                    "min_coins": 3,
                }),
                &admin,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn out_of_range_settings_are_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        for (priority, ads_per_use, min_coins) in [(6, 1, 3), (1, 6, 3), (1, 1, 0), (1, 1, 11)] {
            let res = app
                .post_with_token(
                    routes::PLATFORMS,
                    &json!({
                        "platform_name": "Unity Ads",
                        "api_key": "k",
                        "priority": priority,
                        "ads_per_use": ads_per_use,
                        "min_coins": min_coins,
                    }),
                    &admin,
                )
                .await;
            assert_eq!(res.status, 400, "{priority}/{ads_per_use}/{min_coins}");
        }
    }

    #[tokio::test]
    async fn bulk_edit_changes_the_current_platform() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let unity = app.create_platform(&admin, "Unity Ads", 1, 1, 3).await;
        let admob = app.create_platform(&admin, "Google AdMob", 2, 1, 5).await;
        let device = app.register_device().await;

        let res = app
            .put_with_token(
                routes::PLATFORMS,
                &json!({"platforms": [
                    {"id": unity, "priority": 1, "is_active": false, "ads_per_use": 1, "min_coins": 3},
                    {"id": admob, "priority": 2, "is_active": true, "ads_per_use": 2, "min_coins": 5},
                ]}),
                &admin,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let ad = app.post_as_device(routes::ADS, &device).await;
        assert_eq!(ad.body["platform"], "Google AdMob");
        assert_eq!(ad.body["coins"], 5);
    }

    #[tokio::test]
    async fn bulk_edit_with_unknown_id_changes_nothing() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let unity = app.create_platform(&admin, "Unity Ads", 1, 1, 3).await;

        let res = app
            .put_with_token(
                routes::PLATFORMS,
                &json!({"platforms": [
                    {"id": unity, "priority": 5, "is_active": false, "ads_per_use": 0, "min_coins": 10},
                    {"id": 9999, "priority": 1, "is_active": true, "ads_per_use": 1, "min_coins": 1},
                ]}),
                &admin,
            )
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");

        let list = app.get_with_token(routes::PLATFORMS, &admin).await;
        assert_eq!(list.body[0]["priority"], 1);
        assert_eq!(list.body[0]["is_active"], true);
        assert_eq!(list.body[0]["min_coins"], 3);
    }
}

mod users {
    use super::*;

    #[tokio::test]
    async fn search_matches_device_id_substrings() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let device = app.register_device().await;
        app.register_device().await;

        let all = app.get_with_token(routes::USERS, &admin).await;
        assert_eq!(all.body.as_array().unwrap().len(), 2);

        let needle = &device[..13];
        let res = app
            .get_with_token(&format!("{}?search={needle}", routes::USERS), &admin)
            .await;

        assert_eq!(res.status, 200);
        let found = res.body.as_array().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["device_id"], device);
    }

    #[tokio::test]
    async fn search_input_is_matched_literally() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        app.register_device().await;

        for term in ["%25", "_", "'%20OR%201=1%20--"] {
            let res = app
                .get_with_token(&format!("{}?search={term}", routes::USERS), &admin)
                .await;
            assert_eq!(res.status, 200, "{term}: {}", res.text);
            assert!(res.body.as_array().unwrap().is_empty(), "{term} matched");
        }
    }

    #[tokio::test]
    async fn coins_can_be_granted() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let device = app.register_device().await;
        let me = app.get_as_device(routes::ME, &device).await;
        let id = me.body["id"].as_i64().unwrap();

        let res = app
            .post_with_token(&routes::user_coins(id), &json!({"coins": 25}), &admin)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["coins"], 25);
        let me = app.get_as_device(routes::ME, &device).await;
        assert_eq!(me.body["coins"], 25);
    }

    #[tokio::test]
    async fn grant_outside_one_to_hundred_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let device = app.register_device().await;
        let id = app.get_as_device(routes::ME, &device).await.body["id"]
            .as_i64()
            .unwrap();

        for coins in [0, 101, -5] {
            let res = app
                .post_with_token(&routes::user_coins(id), &json!({"coins": coins}), &admin)
                .await;
            assert_eq!(res.status, 400, "{coins}");
        }
    }

    #[tokio::test]
    async fn grant_to_unknown_user_is_not_found() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let res = app
            .post_with_token(&routes::user_coins(4242), &json!({"coins": 5}), &admin)
            .await;

        assert_eq!(res.status, 404);
    }
}

mod settings {
    use super::*;

    #[tokio::test]
    async fn defaults_are_returned_before_first_save() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let res = app.get_with_token(routes::SETTINGS, &admin).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["free_tier_ads"], 1);
        assert_eq!(res.body["premium_price"], 4.99);
    }

    #[tokio::test]
    async fn saved_settings_replace_the_file() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let body = json!({
            "free_tier_ads": 3,
            "premium_price": 9.99,
            "premium_benefits": "✅ No ads",
        });

        let res = app.put_with_token(routes::SETTINGS, &body, &admin).await;
        assert_eq!(res.status, 200, "{}", res.text);

        let loaded = app.get_with_token(routes::SETTINGS, &admin).await;
        assert_eq!(loaded.body, body);

        let raw = std::fs::read(app.config.storage.settings_path()).unwrap();
        let stored: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(stored, body);
    }

    #[tokio::test]
    async fn invalid_price_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let res = app
            .put_with_token(
                routes::SETTINGS,
                &json!({
                    "free_tier_ads": 1,
                    "premium_price": 0.5,
                    "premium_benefits": "",
                }),
                &admin,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod system {
    use super::*;

    #[tokio::test]
    async fn export_downloads_users_and_captions() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let device = app.register_device().await;
        app.caption_ok(&device).await;

        let res = app
            .client
            .get(format!("http://{}{}", app.addr, routes::EXPORT))
            .header("Authorization", format!("Bearer {admin}"))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), 200);
        assert_eq!(res.headers()["content-type"], "application/zip");
        let bytes = res.bytes().await.unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();

        let mut users = String::new();
        archive
            .by_name("users.csv")
            .unwrap()
            .read_to_string(&mut users)
            .unwrap();
        assert!(users.contains(&device));

        let mut captions = String::new();
        archive
            .by_name("captions.csv")
            .unwrap()
            .read_to_string(&mut captions)
            .unwrap();
        assert_eq!(captions.lines().count(), 2);

        assert!(
            app.config
                .storage
                .exports_dir()
                .join("user_data_export.zip")
                .exists()
        );
    }

    #[tokio::test]
    async fn concurrent_exports_each_download_a_whole_archive() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        for _ in 0..20 {
            app.register_device().await;
        }

        let downloads = (0..12).map(|_| async {
            app.client
                .get(format!("http://{}{}", app.addr, routes::EXPORT))
                .header("Authorization", format!("Bearer {admin}"))
                .send()
                .await
                .unwrap()
                .bytes()
                .await
                .unwrap()
        });

        for bytes in join_all(downloads).await {
            let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
            let mut users = String::new();
            archive
                .by_name("users.csv")
                .unwrap()
                .read_to_string(&mut users)
                .unwrap();
            assert_eq!(users.lines().count(), 21);
        }

        let leftovers = std::fs::read_dir(app.config.storage.exports_dir())
            .unwrap()
            .count();
        assert_eq!(leftovers, 1);
    }

    #[tokio::test]
    async fn backup_is_a_replayable_sql_script() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        app.create_platform(&admin, "Unity Ads", 1, 1, 3).await;
        let device = app.register_device().await;
        app.caption_ok(&device).await;

        let res = app.get_with_token(routes::BACKUP, &admin).await;

        assert_eq!(res.status, 200);
        assert!(res.text.starts_with("BEGIN TRANSACTION;"));
        assert!(res.text.trim_end().ends_with("COMMIT;"));
        assert!(res.text.contains("CREATE TABLE"));
        assert!(res.text.contains(r#"INSERT INTO "user""#));
        assert!(res.text.contains(r#"INSERT INTO "ad_platform""#));
        assert!(res.text.contains(r#"INSERT INTO "caption""#));
        assert!(res.text.contains(&device));
    }
}
