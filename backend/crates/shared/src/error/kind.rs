//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum that maps to HTTP status codes.

use serde::Serialize;

/// エラー種別の列挙体
///
/// プロフィール API が返すステータスコードだけを列挙します。
/// 新しいエンドポイントが別のステータスを返すようになったら
/// ここに追加してください。
///
/// ## Notes
/// * `non_exhaustive` - 列挙子は今後追加される可能性があります
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::TooManyRequests;
/// assert_eq!(kind.status_code(), 429);
/// assert_eq!(kind.as_str(), "Too Many Requests");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 400 - Bad Request: 入力の形式が不正（名前の長さ、PIN の桁数など）
    BadRequest,
    /// 401 - Unauthorized: Bearer トークンが無い、または検証に失敗
    Unauthorized,
    /// 403 - Forbidden: PIN 不一致、またはメインプロフィールの保護
    Forbidden,
    /// 404 - Not Found: プロフィールが存在しない（他アカウント所有を含む）
    NotFound,
    /// 429 - Too Many Requests: PIN 検証の試行回数超過
    TooManyRequests,
    /// 500 - Internal Server Error: 予期しない永続化エラーなど
    InternalServerError,
}

impl ErrorKind {
    /// HTTP ステータスコードへのマッピング
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::Forbidden.status_code(), 403);
    /// ```
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::TooManyRequests => 429,
            ErrorKind::InternalServerError => 500,
        }
    }

    /// 標準的な理由フレーズ
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::TooManyRequests => "Too Many Requests",
            ErrorKind::InternalServerError => "Internal Server Error",
        }
    }

    /// 5xx 系エラーかどうか
    ///
    /// サーバー側のエラーはログに記録し、クライアントには
    /// 汎用メッセージだけを返します。
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// 4xx 系エラーかどうか
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        let code = self.status_code();
        code >= 400 && code < 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
