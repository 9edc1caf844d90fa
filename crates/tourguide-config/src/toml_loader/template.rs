//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# Tour guide configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
# The API key is read from the environment variable named by
# provider.api_key_env, never from this file.

[provider]
# model = "gemini-2.5-flash"
# max_output_tokens = 1024
# timeout_secs = 30          # 1-300
# api_key_env = "GEMINI_API_KEY"

[rate_limit]
# max_requests_per_window = 5   # 1-100
# window_secs = 60              # 1-3600

[prompt]
# question_label = "Câu hỏi của người dùng:"
# instruction = "Hãy trả lời ngắn gọn, mạch lạc và thân thiện."
# context_token_budget = 750     # estimated tokens for the context block
# strip_artifacts = []

[data]
# dir = "."
# tourism_file = "data_tayninh.txt"
# images_file = "images.json"
# max_images = 3             # 0-12

[weather]
# enabled = true
# location_name = "Tân An"
# latitude = 10.7788
# longitude = 106.3533
# cache_ttl_secs = 300       # 60-3600
# timeout_secs = 10

[server]
# bind = "0.0.0.0"
# port = 8080
# session_idle_secs = 1800   # 60-86400
# hello_timeout_secs = 10

[logging]
# level = "info"             # trace, debug, info, warn, error
# log_content = false
"##
}
