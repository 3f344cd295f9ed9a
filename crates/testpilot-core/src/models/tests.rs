#[cfg(test)]
mod model_tests {
    use jiff::Timestamp;

    use crate::models::{
        Browser, Project, ProjectSummary, ProjectType, ScreenshotPolicy, TestCase, TestCaseStatus,
        TestLanguage, VideoPolicy,
    };

    fn create_test_case(id: &str, status: TestCaseStatus) -> TestCase {
        TestCase {
            id: id.to_string(),
            title: "Password Reset".to_string(),
            filename: "password-reset.spec.ts".to_string(),
            content: "import { test } from '@playwright/test';".to_string(),
            created_at: Timestamp::from_second(1640995200).unwrap(), // 2022-01-01 00:00:00 UTC
            commit_hash: "0123456789abcdef0123456789abcdef01234567".to_string(),
            status,
        }
    }

    fn create_test_project() -> Project {
        Project {
            id: "proj-1".to_string(),
            name: "Storefront".to_string(),
            description: "Customer facing shop".to_string(),
            project_type: ProjectType::Existing,
            repo_url: "https://git.example.com/shop.git".to_string(),
            branch: "main".to_string(),
            git_username: "ci".to_string(),
            git_email: "ci@example.com".to_string(),
            git_token: "secret-token".to_string(),
            test_folder: "tests".to_string(),
            base_url: "https://shop.example.com".to_string(),
            test_language: TestLanguage::JavaScript,
            default_browser: Browser::Firefox,
            timeout: 45,
            retries: 2,
            screenshots: ScreenshotPolicy::On,
            headless: false,
            video_recording: VideoPolicy::RetainOnFailure,
            created_at: Timestamp::from_second(1640995200).unwrap(),
            updated_at: Timestamp::from_second(1641081600).unwrap(), // 2022-01-02 00:00:00 UTC
            test_cases: vec![
                create_test_case("tc-1", TestCaseStatus::Committed),
                create_test_case("tc-2", TestCaseStatus::Planned),
            ],
        }
    }

    #[test]
    fn test_project_json_uses_camel_case_keys() {
        let json = serde_json::to_value(create_test_project()).unwrap();

        assert_eq!(json["baseUrl"], "https://shop.example.com");
        assert_eq!(json["testLanguage"], "javascript");
        assert_eq!(json["defaultBrowser"], "firefox");
        assert_eq!(json["screenshots"], "on");
        assert_eq!(json["videoRecording"], "retain-on-failure");
        assert_eq!(json["projectType"], "existing");
        assert_eq!(json["testCases"][0]["commitHash"].as_str().unwrap().len(), 40);
        assert_eq!(json["testCases"][0]["status"], "COMMITTED");
        assert_eq!(json["testCases"][1]["status"], "PLANNED");
    }

    #[test]
    fn test_project_json_round_trip_is_lossless() {
        let project = create_test_project();
        let json = serde_json::to_string(&project).unwrap();
        let restored: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, project);
    }

    #[test]
    fn test_project_deserializes_with_missing_settings() {
        let json = r#"{
            "id": "p",
            "name": "Minimal",
            "createdAt": "2022-01-01T00:00:00Z",
            "updatedAt": "2022-01-01T00:00:00Z"
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.test_language, TestLanguage::TypeScript);
        assert_eq!(project.screenshots, ScreenshotPolicy::OnlyOnFailure);
        assert!(project.test_cases.is_empty());
    }

    #[test]
    fn test_project_lookup_helpers() {
        let project = create_test_project();
        assert_eq!(project.committed_count(), 1);
        assert_eq!(project.test_case("tc-2").unwrap().status, TestCaseStatus::Planned);
        assert!(project.test_case("missing").is_none());
    }

    #[test]
    fn test_project_summary_counts() {
        let project = create_test_project();
        let summary = ProjectSummary::from(&project);
        assert_eq!(summary.id, "proj-1");
        assert_eq!(summary.total_tests, 2);
        assert_eq!(summary.committed_tests, 1);
        assert_eq!(summary.test_language, TestLanguage::JavaScript);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("committed".parse::<TestCaseStatus>(), Ok(TestCaseStatus::Committed));
        assert_eq!("PLANNED".parse::<TestCaseStatus>(), Ok(TestCaseStatus::Planned));
        assert!("pushed".parse::<TestCaseStatus>().is_err());
        assert_eq!(TestCaseStatus::Committed.with_icon(), "✓ Committed");
    }

    #[test]
    fn test_settings_parsing() {
        assert_eq!("ts".parse::<TestLanguage>(), Ok(TestLanguage::TypeScript));
        assert_eq!("JavaScript".parse::<TestLanguage>(), Ok(TestLanguage::JavaScript));
        assert_eq!(TestLanguage::JavaScript.extension(), "js");
        assert_eq!("webkit".parse::<Browser>(), Ok(Browser::Webkit));
        assert_eq!(
            "only-on-failure".parse::<ScreenshotPolicy>(),
            Ok(ScreenshotPolicy::OnlyOnFailure)
        );
        assert_eq!("on-first-retry".parse::<VideoPolicy>(), Ok(VideoPolicy::OnFirstRetry));
        assert!("sometimes".parse::<VideoPolicy>().is_err());
        assert_eq!("existing".parse::<ProjectType>(), Ok(ProjectType::Existing));
    }
}
