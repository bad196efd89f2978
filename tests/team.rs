use test_utils::prelude::*;

mod add {
    use super::*;

    #[tokio::test]
    #[parallel]
    async fn success() {
        let app = get_cached_app().await;
        let name = format!("team-{}", uuid());
        let alice = uuid();

        let res = app
            .post("/team/add")
            .json(&json!({
                "team_name": name,
                "members": [
                    { "user_id": alice, "username": "Alice", "is_active": true },
                ],
            }))
            .send()
            .await;

        assert_eq!(res.status(), StatusCode::CREATED);

        let body = res.json::<Value>().await;

        assert_json_eq!(
            body,
            json!({
                "team": {
                    "team_name": name,
                    "members": [
                        { "user_id": alice, "username": "Alice", "is_active": true },
                    ],
                }
            })
        );
    }

    #[tokio::test]
    #[parallel]
    async fn name_already_taken() {
        let app = get_cached_app().await;
        let team = app.create_team(&[("alice", true)]).await;

        let res = app
            .post("/team/add")
            .json(&json!({
                "team_name": team.name,
                "members": [],
            }))
            .send()
            .await;

        assert_error!(res, error::TEAM_EXISTS);
    }

    #[tokio::test]
    #[parallel]
    async fn duplicate_member() {
        let app = get_cached_app().await;
        let id = uuid();

        let res = app
            .post("/team/add")
            .json(&json!({
                "team_name": uuid(),
                "members": [
                    { "user_id": id, "username": "Alice", "is_active": true },
                    { "user_id": id, "username": "Alice again", "is_active": false },
                ],
            }))
            .send()
            .await;

        assert_error!(res, error::DUPLICATE_MEMBER);
    }

    #[tokio::test]
    #[parallel]
    async fn missing_fields() {
        let app = get_cached_app().await;

        let res = app
            .post("/team/add")
            .json(&json!({
                "team_name": uuid(),
            }))
            .send()
            .await;

        assert_error!(res, error::JSON_MISSING_FIELDS);
    }

    #[tokio::test]
    #[parallel]
    async fn empty_team_name() {
        let app = get_cached_app().await;

        let res = app
            .post("/team/add")
            .json(&json!({
                "team_name": "",
                "members": [],
            }))
            .send()
            .await;

        assert_error!(res, error::JSON_VALIDATE_INVALID);
    }

    #[tokio::test]
    #[parallel]
    async fn syntax_error() {
        let app = get_cached_app().await;

        let res = app
            .post("/team/add")
            .header(header::CONTENT_TYPE, "application/json")
            .body("{\"team_name\": ")
            .send()
            .await;

        assert_error!(res, error::JSON_SYNTAX_ERROR);
    }

    #[tokio::test]
    #[parallel]
    async fn existing_user_moves_to_new_team() {
        let app = get_cached_app().await;
        let old_team = app.create_team(&[("alice", true), ("bob", true)]).await;
        let new_name = format!("team-{}", uuid());

        let res = app
            .post("/team/add")
            .json(&json!({
                "team_name": new_name,
                "members": [
                    { "user_id": old_team.id("bob"), "username": "Bobby", "is_active": false },
                ],
            }))
            .send()
            .await;

        assert_eq!(res.status(), StatusCode::CREATED);

        let res = app
            .get("/team/get")
            .query(&[("team_name", &old_team.name)])
            .send()
            .await;
        let body = res.json::<Value>().await;

        assert_eq!(body["members"].as_array().unwrap().len(), 1);
        assert_eq!(body["members"][0]["user_id"], old_team.id("alice"));
    }
}

mod get {
    use super::*;

    #[tokio::test]
    #[parallel]
    async fn success() {
        let app = get_cached_app().await;
        let team = app
            .create_team(&[("bob", false), ("alice", true)])
            .await;

        let res = app
            .get("/team/get")
            .query(&[("team_name", &team.name)])
            .send()
            .await;

        assert_eq!(res.status(), StatusCode::OK);

        let body = res.json::<Value>().await;

        assert_json_eq!(
            body,
            json!({
                "team_name": team.name,
                "members": [
                    { "user_id": team.id("alice"), "username": "alice", "is_active": true },
                    { "user_id": team.id("bob"), "username": "bob", "is_active": false },
                ],
            })
        );
    }

    #[tokio::test]
    #[parallel]
    async fn not_found() {
        let app = get_cached_app().await;

        let res = app
            .get("/team/get")
            .query(&[("team_name", uuid())])
            .send()
            .await;

        assert_error!(res, error::TEAM_NOT_FOUND);
    }

    #[tokio::test]
    #[parallel]
    async fn missing_param() {
        let app = get_cached_app().await;

        let res = app.get("/team/get").send().await;

        assert_error!(res, error::QUERY_INVALID);
    }

    #[tokio::test]
    #[parallel]
    async fn empty_param() {
        let app = get_cached_app().await;

        let res = app.get("/team/get?team_name=").send().await;

        assert_error!(res, error::QUERY_INVALID);
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    #[parallel]
    async fn cascades_to_users_and_pull_requests() {
        let app = get_cached_app().await;
        let team = app
            .create_team(&[("alice", true), ("bob", true), ("charlie", true)])
            .await;
        let pr_id = uuid();
        app.create_pull_request(&pr_id, &team.id("alice")).await;

        let res = app
            .delete("/team/delete")
            .query(&[("team_name", &team.name)])
            .send()
            .await;

        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = app
            .get("/team/get")
            .query(&[("team_name", &team.name)])
            .send()
            .await;
        assert_error!(res, error::TEAM_NOT_FOUND);

        let res = app
            .get("/users/getReview")
            .query(&[("user_id", team.id("bob"))])
            .send()
            .await;
        assert_error!(res, error::USER_NOT_FOUND);

        let res = app
            .post("/pullRequest/merge")
            .json(&json!({ "pull_request_id": pr_id }))
            .send()
            .await;
        assert_error!(res, error::PR_NOT_FOUND);
    }

    #[tokio::test]
    #[parallel]
    async fn not_found() {
        let app = get_cached_app().await;

        let res = app
            .delete("/team/delete")
            .query(&[("team_name", uuid())])
            .send()
            .await;

        assert_error!(res, error::TEAM_NOT_FOUND);
    }
}

mod probes {
    use super::*;

    #[tokio::test]
    #[parallel]
    async fn liveness_and_readiness() {
        let app = get_cached_app().await;

        assert_eq!(app.get("/livez").send().await.status(), StatusCode::OK);
        assert_eq!(app.get("/readyz").send().await.status(), StatusCode::OK);
    }

    #[tokio::test]
    #[parallel]
    async fn request_id_is_propagated() {
        let app = get_cached_app().await;

        let res = app.get("/readyz").header("x-request-id", "abc-123").send().await;

        assert_eq!(res.headers()["x-request-id"], "abc-123");
    }
}
