/// 预检发现的结构问题
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestingProblem {
    /// 括号层级超过 `limit`
    TooDeep { limit: usize },
    /// 出现没有对应开括号的闭括号
    UnmatchedCloser,
}

/// 预检失败的位置：`offset` 为字节偏移（从 0 开始），行列号从 1 开始，列按字节计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestingError {
    pub problem: NestingProblem,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for NestingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.problem {
            NestingProblem::TooDeep { limit } => write!(f, "nesting exceeds {} levels", limit)?,
            NestingProblem::UnmatchedCloser => write!(f, "unmatched closing bracket")?,
        }
        write!(f, " at line {} column {}", self.line, self.column)
    }
}

impl std::error::Error for NestingError {}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Structure,
    InString,
    AfterBackslash,
}

/// 解析前的嵌套预检
///
/// 只按字节扫描括号层级，不构建值树，字符串内的括号与转义会被跳过。
/// 根容器为第 1 层，纯标量文本为 0 层。
pub fn check_nesting(input: &str, limit: usize) -> Result<(), NestingError> {
    let mut scan = Scan::Structure;
    let mut nesting = 0usize;
    let mut line = 1;
    let mut line_start = 0;

    for (offset, byte) in input.bytes().enumerate() {
        let fail = |problem| NestingError {
            problem,
            offset,
            line,
            column: offset - line_start + 1,
        };

        scan = match (scan, byte) {
            (Scan::AfterBackslash, _) => Scan::InString,
            (Scan::InString, b'\\') => Scan::AfterBackslash,
            (Scan::InString, b'"') => Scan::Structure,
            (Scan::InString, _) => Scan::InString,
            (Scan::Structure, b'"') => Scan::InString,
            (Scan::Structure, b'{' | b'[') => {
                nesting += 1;
                if nesting > limit {
                    return Err(fail(NestingProblem::TooDeep { limit }));
                }
                Scan::Structure
            }
            (Scan::Structure, b'}' | b']') => {
                nesting = nesting
                    .checked_sub(1)
                    .ok_or_else(|| fail(NestingProblem::UnmatchedCloser))?;
                Scan::Structure
            }
            (Scan::Structure, _) => Scan::Structure,
        };

        if byte == b'\n' {
            line += 1;
            line_start = offset + 1;
        }
    }

    Ok(())
}
