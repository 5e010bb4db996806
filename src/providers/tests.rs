//! Zone API tests with HTTP mocking.

mod hosttech_tests {
    use crate::error::DdnsError;
    use crate::providers::{HosttechClient, RecordDraft, RecordType, ZoneApi};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HosttechClient {
        HosttechClient::with_base_url("test-token".to_string(), server.uri())
    }

    #[tokio::test]
    async fn test_find_zone_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/user/v1/zones"))
            .and(query_param("query", "example.com"))
            .and(query_param("limit", "1"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": 42, "name": "example.com", "email": "admin@example.com"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let zone = client(&mock_server).find_zone("example.com").await.unwrap();

        assert_eq!(zone.id, 42);
        assert_eq!(zone.name, "example.com");
    }

    #[tokio::test]
    async fn test_find_zone_no_match() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/user/v1/zones"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).find_zone("example.invalid").await;

        assert!(matches!(result, Err(DdnsError::ZoneNotFound(q)) if q == "example.invalid"));
    }

    #[tokio::test]
    async fn test_find_zone_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/user/v1/zones"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthenticated."})),
            )
            .mount(&mock_server)
            .await;

        let err = client(&mock_server).find_zone("example.com").await.unwrap_err();

        match err {
            DdnsError::Api { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("Unauthenticated"));
                assert!(!message.contains("test-token"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_list_records_keeps_address_records() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/user/v1/zones/42/records"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"id": 1, "type": "A", "name": "", "ipv4": "1.1.1.1", "ttl": 600, "comment": ""},
                    {"id": 2, "type": "AAAA", "name": null, "ipv6": "2001:db8::1", "ttl": 3600},
                    {"id": 3, "type": "CNAME", "name": "www", "cname": "example.com.", "ttl": 3600},
                    {"id": 4, "type": "MX", "name": "", "ownername": "", "pref": 10, "ttl": 3600},
                    {"id": 5, "type": "A", "name": "vpn", "ipv4": "1.1.1.2"}
                ]
            })))
            .mount(&mock_server)
            .await;

        let records = client(&mock_server).list_records(42).await.unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].record_type, RecordType::A);
        assert_eq!(records[0].name.as_deref(), Some(""));
        assert_eq!(records[0].ttl, 600);
        assert_eq!(records[1].record_type, RecordType::AAAA);
        assert_eq!(records[1].name, None);
        assert_eq!(records[1].address, "2001:db8::1");
        // missing ttl falls back to the default
        assert_eq!(records[2].ttl, 3600);
    }

    #[tokio::test]
    async fn test_create_record_sends_typed_address() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user/v1/zones/42/records"))
            .and(body_json(json!({
                "type": "AAAA",
                "name": "sub",
                "ttl": 3600,
                "ipv6": "2001:db8::2"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": {"id": 77, "type": "AAAA", "name": "sub", "ipv6": "2001:db8::2", "ttl": 3600}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let draft = RecordDraft::create(RecordType::AAAA, "sub", "2001:db8::2");
        let record = client(&mock_server).create_record(42, &draft).await.unwrap();

        assert_eq!(record.id, 77);
        assert_eq!(record.address, "2001:db8::2");
    }

    #[tokio::test]
    async fn test_create_record_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user/v1/zones/42/records"))
            .respond_with(ResponseTemplate::new(422).set_body_string("The ipv4 field is invalid."))
            .mount(&mock_server)
            .await;

        let draft = RecordDraft::create(RecordType::A, "sub", "not-an-ip");
        let result = client(&mock_server).create_record(42, &draft).await;

        assert!(matches!(result, Err(DdnsError::Api { status: 422, .. })));
    }

    #[tokio::test]
    async fn test_update_record_resends_null_name() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/user/v1/zones/42/records/2"))
            .and(header("Authorization", "Bearer test-token"))
            .and(body_json(json!({
                "type": "A",
                "name": null,
                "ttl": 600,
                "ipv4": "2.2.2.2"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": 2, "type": "A", "name": null, "ipv4": "2.2.2.2", "ttl": 600}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let draft = RecordDraft {
            record_type: RecordType::A,
            name: None,
            ttl: 600,
            address: "2.2.2.2".to_string(),
        };
        let record = client(&mock_server).update_record(42, 2, &draft).await.unwrap();

        assert_eq!(record.id, 2);
        assert_eq!(record.address, "2.2.2.2");
    }

    #[tokio::test]
    async fn test_update_record_requires_200() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/user/v1/zones/42/records/2"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": {"id": 2, "type": "A", "name": "", "ipv4": "2.2.2.2", "ttl": 600}
            })))
            .mount(&mock_server)
            .await;

        let draft = RecordDraft::create(RecordType::A, "", "2.2.2.2");
        let result = client(&mock_server).update_record(42, 2, &draft).await;

        assert!(matches!(result, Err(DdnsError::Api { status: 201, .. })));
    }

    #[tokio::test]
    async fn test_delete_record_expects_no_content() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/user/v1/zones/42/records/9"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/user/v1/zones/42/records/10"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let client = client(&mock_server);

        assert!(client.delete_record(42, 9).await.is_ok());
        assert!(matches!(
            client.delete_record(42, 10).await,
            Err(DdnsError::Api { status: 200, .. })
        ));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = HosttechClient::new("super-secret".to_string());
        let debug = format!("{:?}", client);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("api.ns1.hosttech.eu"));
    }
}
