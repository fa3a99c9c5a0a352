//! 分布式唯一 ID 生成器
//!
//! 不依赖数据库自增主键，适用于多个服务实例同时写入同一张表。
//! 位布局（共 63 位，保证为正的 i64）：
//!
//! | 时间 39 位 | 序列号 8 位 | 节点号 16 位 |
//!
//! 时间以 10ms 为单位，从 2014-09-01T00:00:00Z 起算，约可使用 174 年。

use crate::data::{DataError, Result};
use crate::models::config::StoreConfig;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Mutex;
use std::time::Duration;

const BITS_TIME: u32 = 39;
const BITS_SEQUENCE: u32 = 8;
const BITS_NODE: u32 = 16;

const MASK_SEQUENCE: u16 = (1 << BITS_SEQUENCE) - 1;
const MAX_ELAPSED: i64 = (1 << BITS_TIME) - 1;

/// 时间单位（毫秒）
const TIME_UNIT_MS: i64 = 10;

/// 固定纪元
fn default_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2014, 9, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// ID 的组成部分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdParts {
    /// 纪元起经过的时间单位数
    pub elapsed: u64,
    pub sequence: u16,
    pub node_id: u16,
}

#[derive(Debug)]
struct GeneratorState {
    elapsed: i64,
    sequence: u16,
}

/// 分布式 ID 生成器，同一实例生成的 ID 严格递增
#[derive(Debug)]
pub struct IdGenerator {
    node_id: u16,
    /// 纪元（毫秒时间戳）
    start_ms: i64,
    state: Mutex<GeneratorState>,
}

impl IdGenerator {
    pub fn new(node_id: u16) -> Self {
        Self::build(node_id, default_epoch())
    }

    /// 使用自定义纪元，纪元不能晚于当前时间
    pub fn with_start_time(node_id: u16, start: DateTime<Utc>) -> Result<Self> {
        if start > Utc::now() {
            return Err(DataError::IdGeneration(format!(
                "纪元 {} 晚于当前时间",
                start.to_rfc3339()
            )));
        }
        Ok(Self::build(node_id, start))
    }

    /// 按配置创建：优先使用配置中的节点号，否则取进程号低 16 位
    pub fn from_config(config: &StoreConfig) -> Self {
        let node_id = config
            .node_id
            .unwrap_or_else(|| (std::process::id() & 0xFFFF) as u16);
        Self::new(node_id)
    }

    fn build(node_id: u16, start: DateTime<Utc>) -> Self {
        Self {
            node_id,
            start_ms: start.timestamp_millis(),
            state: Mutex::new(GeneratorState {
                elapsed: 0,
                // 首个 ID 的序列号为 0
                sequence: MASK_SEQUENCE,
            }),
        }
    }

    pub fn node_id(&self) -> u16 {
        self.node_id
    }

    fn current_elapsed(&self) -> Result<i64> {
        let now_ms = Utc::now().timestamp_millis();
        if now_ms < self.start_ms {
            return Err(DataError::IdGeneration("系统时钟早于纪元".to_string()));
        }
        Ok((now_ms - self.start_ms) / TIME_UNIT_MS)
    }

    /// 生成下一个 ID
    ///
    /// 同一时间单位内序列号用尽时借用下一个时间单位，并最多休眠一个单位；
    /// 时钟回拨时沿用上一次的时间，保证单调递增。
    pub fn next_id(&self) -> Result<u64> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| DataError::Concurrency(e.to_string()))?;

        let current = self.current_elapsed()?;
        if state.elapsed < current {
            state.elapsed = current;
            state.sequence = 0;
        } else {
            state.sequence = (state.sequence + 1) & MASK_SEQUENCE;
            if state.sequence == 0 {
                state.elapsed += 1;
                // 持锁休眠：时钟大幅回拨后也只等一个单位
                let overtime = (state.elapsed - current).min(1);
                std::thread::sleep(Duration::from_millis((overtime * TIME_UNIT_MS) as u64));
            }
        }

        if state.elapsed > MAX_ELAPSED {
            return Err(DataError::IdGeneration("时间范围已用尽".to_string()));
        }

        Ok(((state.elapsed as u64) << (BITS_SEQUENCE + BITS_NODE))
            | ((state.sequence as u64) << BITS_NODE)
            | self.node_id as u64)
    }

    /// 拆解 ID（调试用）
    pub fn decompose(id: u64) -> IdParts {
        IdParts {
            elapsed: id >> (BITS_SEQUENCE + BITS_NODE),
            sequence: ((id >> BITS_NODE) as u16) & MASK_SEQUENCE,
            node_id: (id & 0xFFFF) as u16,
        }
    }
}
