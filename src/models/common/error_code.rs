/// 业务错误码
///
/// 0 表示成功；1xxx 为通用错误，其余按资源分段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    Unprocessable = 1022,
    RateLimitExceeded = 1029,
    InternalServerError = 1050,

    // 认证
    AuthFailed = 2000,
    RegisterFailed = 2001,

    // 用户
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserCreationFailed = 3010,
    UserUpdateFailed = 3011,
    UserDeleteFailed = 3012,
    CanNotDeleteCurrentUser = 3013,

    // 院系 / 课程
    DepartmentNotFound = 4000,
    DepartmentAlreadyExists = 4001,
    DepartmentInUse = 4002,
    CourseNotFound = 4100,
    CourseAlreadyExists = 4101,
    CourseInUse = 4102,

    // 分类 / 题目
    CategoryNotFound = 4200,
    CategoryAlreadyExists = 4201,
    CategoryInUse = 4202,
    CategoryWeightInvalid = 4203,
    QuestionNotFound = 4300,
    QuestionAlreadyExists = 4301,
    QuestionInvalid = 4302,

    // 表单
    FormNotFound = 5000,
    FormInvalid = 5001,
    FormNotOpen = 5002,
    FormInUse = 5003,

    // 评教
    EvaluationNotFound = 6000,
    EvaluationInvalid = 6001,
    EvaluationAlreadyExists = 6002,
    EvaluationFlowNotAllowed = 6003,
    EvaluationPermissionDenied = 6004,
}
