// =====================================================================================
// CATALOG CONSTANTS
// =====================================================================================
//
// Fixed per-kind domain knowledge. Thresholds are design defaults and are not
// caller configurable.
//
// =====================================================================================

pub const NS_ECS: &str = "AWS/ECS";
pub const NS_CONTAINER_INSIGHTS: &str = "ECS/ContainerInsights";
pub const NS_LAMBDA: &str = "AWS/Lambda";
pub const NS_RDS: &str = "AWS/RDS";
pub const NS_DYNAMODB: &str = "AWS/DynamoDB";
pub const NS_ALB: &str = "AWS/ApplicationELB";
pub const NS_NLB: &str = "AWS/NetworkELB";
pub const NS_EC2: &str = "AWS/EC2";
pub const NS_S3: &str = "AWS/S3";

// Compute (ECS services, clusters, EC2)
pub const CPU_UTILIZATION_THRESHOLD_PERCENT: f64 = 80.0;
pub const MEMORY_UTILIZATION_THRESHOLD_PERCENT: f64 = 80.0;
pub const MIN_RUNNING_TASKS: f64 = 1.0;
pub const INSTANCE_STATUS_CHECK_THRESHOLD: f64 = 1.0;

// Functions
pub const FUNCTION_ERROR_THRESHOLD: f64 = 5.0;
pub const FUNCTION_THROTTLE_THRESHOLD: f64 = 0.0;
/// Average duration close to the 30 second default timeout.
pub const FUNCTION_DURATION_THRESHOLD_MS: f64 = 25_000.0;
/// Default regional concurrency quota, used as the gauge ceiling.
pub const FUNCTION_CONCURRENCY_LIMIT: f64 = 1_000.0;

// Relational databases
pub const DATABASE_CPU_THRESHOLD_PERCENT: f64 = 80.0;
pub const DATABASE_FREE_STORAGE_THRESHOLD_BYTES: f64 = 10.0 * 1024.0 * 1024.0 * 1024.0;
pub const DATABASE_CONNECTIONS_THRESHOLD: f64 = 80.0;

// Key-value tables
pub const TABLE_THROTTLE_THRESHOLD: f64 = 0.0;
pub const TABLE_SYSTEM_ERROR_THRESHOLD: f64 = 0.0;

// Load balancers
pub const ALB_TARGET_5XX_THRESHOLD: f64 = 10.0;
pub const ALB_RESPONSE_TIME_THRESHOLD_SECONDS: f64 = 1.0;
pub const UNHEALTHY_HOST_THRESHOLD: f64 = 0.0;
pub const NLB_TARGET_RESET_THRESHOLD: f64 = 100.0;

// Object storage
pub const BUCKET_5XX_THRESHOLD: f64 = 0.0;
/// Storage metrics are only published once a day.
pub const BUCKET_STORAGE_PERIOD_SECONDS: u32 = 86_400;
pub const BUCKET_REQUEST_FILTER_ID: &str = "EntireBucket";

pub const LAMBDA_LOG_GROUP_PREFIX: &str = "/aws/lambda/";
pub const ECS_LOG_GROUP_PREFIX: &str = "/ecs/";
