use std::sync::Arc;

use caption_server::config::CreditMode;

use crate::common::{
    FailingModel, HeldModel, STUB_DESCRIPTION, TestApp, TestOptions, png_bytes, routes,
};

mod generation {
    use super::*;

    #[tokio::test]
    async fn caption_uses_the_model_description_and_derived_hashtags() {
        let app = TestApp::spawn().await;
        let device = app.register_device().await;

        let res = app.upload_caption(&device, png_bytes(), None).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["caption"], "A dog running along the sunny beach");
        assert_eq!(
            res.body["hashtags"],
            "#running #along #sunny #beach #InstaAI #SocialMedia"
        );
        assert_eq!(res.body["style"], "smart");
        assert_eq!(res.body["caption_count"], 1);
        assert_eq!(res.body["image_hash"].as_str().unwrap().len(), 64);
        assert_eq!(
            res.body["clipboard"],
            "A dog running along the sunny beach\n\n#running #along #sunny #beach #InstaAI #SocialMedia"
        );
    }

    #[tokio::test]
    async fn style_may_be_chosen_by_key_or_label() {
        let app = TestApp::spawn().await;
        let device = app.register_device().await;

        let funny = app.upload_caption(&device, png_bytes(), Some("funny")).await;
        assert_eq!(funny.status, 201, "{}", funny.text);
        assert_eq!(
            funny.body["caption"],
            "LOL when I dog running along the sunny beach 😂"
        );

        let pro = app
            .upload_caption(&device, png_bytes(), Some("💼 Professional"))
            .await;
        assert_eq!(pro.status, 201, "{}", pro.text);
        assert_eq!(
            pro.body["caption"],
            format!("High-quality image showing: {STUB_DESCRIPTION}")
        );
    }

    #[tokio::test]
    async fn unknown_style_falls_back_to_smart() {
        let app = TestApp::spawn().await;
        let device = app.register_device().await;

        let res = app
            .upload_caption(&device, png_bytes(), Some("sarcastic"))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["style"], "smart");
    }

    #[tokio::test]
    async fn non_image_upload_is_rejected() {
        let app = TestApp::spawn().await;
        let device = app.register_device().await;

        let res = app
            .upload_caption(&device, b"definitely not a picture".to_vec(), None)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let me = app.get_as_device(routes::ME, &device).await;
        assert_eq!(me.body["caption_count"], 0);
    }

    #[tokio::test]
    async fn model_failure_is_reported_and_not_counted() {
        let app = TestApp::spawn_with(TestOptions {
            model: Arc::new(FailingModel),
            ..Default::default()
        })
        .await;
        let device = app.register_device().await;

        let res = app.upload_caption(&device, png_bytes(), None).await;

        assert_eq!(res.status, 502);
        assert_eq!(res.body["code"], "CAPTION_MODEL_ERROR");

        let me = app.get_as_device(routes::ME, &device).await;
        assert_eq!(me.body["caption_count"], 0);
    }

    #[tokio::test]
    async fn history_lists_newest_first() {
        let app = TestApp::spawn().await;
        let device = app.register_device().await;
        let other = app.register_device().await;

        let first = app.caption_ok(&device).await.id();
        let second = app.caption_ok(&device).await.id();
        app.caption_ok(&other).await;

        let res = app.get_as_device(routes::CAPTIONS, &device).await;

        assert_eq!(res.status, 200);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["id"], second);
        assert_eq!(data[1]["id"], first);
        assert_eq!(res.body["pagination"]["total"], 2);
    }

    #[tokio::test]
    async fn history_page_past_the_row_space_is_rejected() {
        let app = TestApp::spawn().await;
        let device = app.register_device().await;
        app.caption_ok(&device).await;

        let path = format!("{}?page={}", routes::CAPTIONS, u64::MAX);
        let res = app.get_as_device(&path, &device).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let res = app
            .get_as_device(&format!("{}?page=2&per_page=1", routes::CAPTIONS), &device)
            .await;
        assert_eq!(res.status, 200);
        assert!(res.body["data"].as_array().unwrap().is_empty());
    }
}

mod gating {
    use super::*;

    #[tokio::test]
    async fn fourth_caption_requires_an_ad() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        app.create_platform(&admin, "Unity Ads", 1, 1, 3).await;
        let device = app.register_device().await;

        for _ in 0..3 {
            app.caption_ok(&device).await;
        }

        let blocked = app.upload_caption(&device, png_bytes(), None).await;
        assert_eq!(blocked.status, 403);
        assert_eq!(blocked.body["code"], "AD_REQUIRED");
        assert_eq!(blocked.body["ads_required"], 1);
        assert_eq!(blocked.body["ads_watched"], 0);

        app.watch_ad(&device).await;

        let unlocked = app.upload_caption(&device, png_bytes(), None).await;
        assert_eq!(unlocked.status, 201, "{}", unlocked.text);
        assert_eq!(unlocked.body["caption_count"], 4);
    }

    #[tokio::test]
    async fn gate_requires_the_current_platforms_ad_count() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        app.create_platform(&admin, "AppLovin", 2, 1, 3).await;
        app.create_platform(&admin, "Google AdMob", 1, 2, 3).await;
        let device = app.register_device().await;

        for _ in 0..3 {
            app.caption_ok(&device).await;
        }
        app.watch_ad(&device).await;

        let blocked = app.upload_caption(&device, png_bytes(), None).await;
        assert_eq!(blocked.status, 403);
        assert_eq!(blocked.body["ads_required"], 2);
        assert_eq!(blocked.body["ads_watched"], 1);

        app.watch_ad(&device).await;
        app.caption_ok(&device).await;
    }

    #[tokio::test]
    async fn per_cycle_credit_is_spent_by_the_gated_caption() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        app.create_platform(&admin, "Unity Ads", 1, 1, 3).await;
        let device = app.register_device().await;

        for _ in 0..3 {
            app.caption_ok(&device).await;
        }
        app.watch_ad(&device).await;
        for _ in 0..3 {
            app.caption_ok(&device).await;
        }

        // Seventh caption (index 6) needs a fresh ad.
        let blocked = app.upload_caption(&device, png_bytes(), None).await;
        assert_eq!(blocked.status, 403);
        assert_eq!(blocked.body["ads_watched"], 0);

        let me = app.get_as_device(routes::ME, &device).await;
        assert_eq!(me.body["ads_watched"], 1);
        assert_eq!(me.body["gate"]["unlocked"], false);
    }

    #[tokio::test]
    async fn ad_watched_during_a_gated_caption_stays_credited() {
        let held = Arc::new(HeldModel::holding(3));
        let app = TestApp::spawn_with(TestOptions {
            model: held.clone(),
            ..Default::default()
        })
        .await;
        let admin = app.admin_token().await;
        app.create_platform(&admin, "Unity Ads", 1, 1, 3).await;
        let device = app.register_device().await;

        for _ in 0..3 {
            app.caption_ok(&device).await;
        }
        app.watch_ad(&device).await;

        let (gated, _) = tokio::join!(app.upload_caption(&device, png_bytes(), None), async {
            held.entered.notified().await;
            app.watch_ad(&device).await;
            held.release.notify_one();
        });
        assert_eq!(gated.status, 201, "{}", gated.text);

        let me = app.get_as_device(routes::ME, &device).await;
        assert_eq!(me.body["caption_count"], 4);
        assert_eq!(me.body["ads_watched"], 2);
        assert_eq!(me.body["gate"]["ads_watched"], 1);
    }

    #[tokio::test]
    async fn cumulative_credit_counts_every_ad_ever_watched() {
        let app = TestApp::spawn_with(TestOptions {
            credit_mode: CreditMode::Cumulative,
            ..Default::default()
        })
        .await;
        let admin = app.admin_token().await;
        app.create_platform(&admin, "Unity Ads", 1, 1, 3).await;
        let device = app.register_device().await;

        for _ in 0..3 {
            app.caption_ok(&device).await;
        }
        app.watch_ad(&device).await;
        for _ in 0..4 {
            app.caption_ok(&device).await;
        }

        let me = app.get_as_device(routes::ME, &device).await;
        assert_eq!(me.body["caption_count"], 7);
    }

    #[tokio::test]
    async fn gate_without_active_platform_still_requires_one_ad() {
        let app = TestApp::spawn().await;
        let device = app.register_device().await;

        for _ in 0..3 {
            app.caption_ok(&device).await;
        }

        let me = app.get_as_device(routes::ME, &device).await;
        assert_eq!(me.body["gate"]["no_active_platform"], true);
        assert_eq!(me.body["gate"]["ads_required"], 1);

        let blocked = app.upload_caption(&device, png_bytes(), None).await;
        assert_eq!(blocked.status, 403);
        assert_eq!(blocked.body["code"], "AD_REQUIRED");
    }
}
