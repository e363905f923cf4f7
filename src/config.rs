//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: 액세스 토큰 검증에 사용할 비밀키 (필수)
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호
//! - `MAX_CHAPTER_VERSIONS`: 챕터당 보관할 최대 버전 수 (최소 1)
//! - `MAX_DIFF_LINES`: diff 입력 한쪽의 최대 줄 수
//! - `MAX_DIFF_CELLS`: LCS 테이블 칸 수 `(m+1)·(n+1)` 상한
//! - `FRONTEND_DIST`: 프론트엔드 빌드 결과 디렉토리

use std::env;
use std::str::FromStr;

/// 기본 챕터 버전 보관 개수
pub const DEFAULT_MAX_CHAPTER_VERSIONS: u32 = 50;
/// 기본 diff 줄 수 제한
pub const DEFAULT_MAX_DIFF_LINES: usize = 5000;
/// 기본 LCS 테이블 칸 수 제한 (64비트에서 약 32MB)
pub const DEFAULT_MAX_DIFF_CELLS: usize = 4_000_000;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 파일 경로 (예: "sqlite:data/storychain.db")
    pub database_url: String,
    /// 액세스 토큰 서명 검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
    pub max_chapter_versions: u32,
    pub max_diff_lines: usize,
    pub max_diff_cells: usize,
    /// 기본값: "../frontend/dist"
    pub frontend_dist: String,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있고, 숫자 파싱에 실패해도 기본값을 씁니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// `lookup`으로 값을 읽어 설정을 만듭니다. 테스트는 프로세스 환경변수 대신 맵을 넘깁니다.
    ///
    /// 버전 보관 개수는 최소 1로 올립니다. 0이면 방금 남긴 스냅샷까지 정리되기 때문입니다.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, env::VarError> {
        let required = |key: &str| lookup(key).ok_or(env::VarError::NotPresent);
        let parse_or = |key: &str, default| {
            lookup(key)
                .and_then(|value| parse_value(&value))
                .unwrap_or(default)
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|value| parse_value(&value))
                .unwrap_or(3000),
            max_chapter_versions: lookup("MAX_CHAPTER_VERSIONS")
                .and_then(|value| parse_value(&value))
                .unwrap_or(DEFAULT_MAX_CHAPTER_VERSIONS)
                .max(1),
            max_diff_lines: parse_or("MAX_DIFF_LINES", DEFAULT_MAX_DIFF_LINES),
            max_diff_cells: parse_or("MAX_DIFF_CELLS", DEFAULT_MAX_DIFF_CELLS),
            frontend_dist: lookup("FRONTEND_DIST")
                .unwrap_or_else(|| "../frontend/dist".to_string()),
        })
    }

    /// `host:port` 형태의 바인딩 주소
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_value<T: FromStr>(value: &str) -> Option<T> {
    value.trim().parse().ok()
}
