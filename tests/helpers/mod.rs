// 各测试文件只用到部分辅助函数
#![allow(dead_code)]

pub mod record_builder;
pub mod test_env;
