pub mod lex;
pub mod rekognition;
pub mod s3;
