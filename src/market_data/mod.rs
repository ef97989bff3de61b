//! 가격 이력 제공자
//!
//! Yahoo 차트 API와 CSV 파일 두 가지 소스를 지원합니다.

pub mod csv_file;
pub mod provider;
pub mod yahoo;

pub use csv_file::CsvPriceProvider;
pub use provider::PriceHistoryProvider;
pub use yahoo::YahooChartProvider;
