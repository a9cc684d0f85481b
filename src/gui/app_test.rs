#[cfg(test)]
mod tests {
    use crate::core::{AppConfig, JobController, JobRequest, JobState};
    use crate::gui::app::AnalysisApp;
    use std::time::Duration;

    // Test helper building an app instance without an egui context.
    fn create_test_app() -> AnalysisApp {
        let config = AppConfig::default();
        let output_path = config.default_output_path().display().to_string();
        AnalysisApp {
            config,
            input_path: String::new(),
            output_path,
            controller: JobController::new(),
            status_message: "Ready".to_string(),
            error_message: None,
            show_success_popup: false,
        }
    }

    #[test]
    fn test_app_starts_idle_with_default_output_path() {
        let app = create_test_app();

        assert!(app.input_path.is_empty());
        assert!(app.output_path.ends_with("output_video.avi"));
        assert_eq!(app.controller.state(), JobState::Idle);
        assert_eq!(app.status_message, "Ready");
        assert!(app.error_message.is_none());
        assert!(!app.show_success_popup);
    }

    #[test]
    fn test_start_affordance_follows_controller_state() {
        let mut app = create_test_app();
        assert!(app.can_start());
        assert!(!app.can_open_output());

        let dir = std::env::temp_dir()
            .join(format!("football-analysis-app-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("match.mp4");
        std::fs::write(&input, b"fake").unwrap();

        app.controller
            .start(JobRequest::new(&input, dir.join("out.avi")), |_, _| {
                std::thread::sleep(Duration::from_millis(150));
                Ok(())
            })
            .unwrap();
        assert!(!app.can_start());
        assert!(!app.can_open_output());

        // The in-flight status line names the file being processed.
        assert!(app.running_status().contains("match.mp4"));

        // Drain the outcome the way the update loop does.
        for _ in 0..100 {
            if app.controller.poll().is_some() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(app.controller.state(), JobState::Succeeded);
        assert!(app.can_start());
        assert!(app.can_open_output());
    }

    #[test]
    fn test_completed_job_updates_status_with_finish_time() {
        let mut app = create_test_app();

        let dir = std::env::temp_dir()
            .join(format!("football-analysis-app-status-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("match.mp4");
        std::fs::write(&input, b"fake").unwrap();

        app.controller
            .start(JobRequest::new(&input, dir.join("out.avi")), |_, _| Ok(()))
            .unwrap();

        for _ in 0..100 {
            app.process_job_events();
            if app.show_success_popup {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }

        assert!(app.show_success_popup);
        assert!(app.status_message.starts_with("Processing Complete at "));
    }
}
