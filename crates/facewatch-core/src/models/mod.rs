//! FACEWATCH 도메인 모델.
//!
//! 프레임, 특징 검출 결과, 유휴/종료 가드 상태와 사용자 명령을 정의한다.

pub mod command;
pub mod detection;
pub mod frame;
pub mod guard;
