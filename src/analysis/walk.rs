use serde_json::Value;

/// 遍历允许的绝对嵌套层级，与配置中的 `max_depth` 无关
pub const MAX_TRAVERSAL_DEPTH: usize = 10_000;

/// JSON 节点的运行时类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

/// 遍历过程中交给访问者的节点摘要
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    pub kind: ValueKind,
    /// 根节点为 1
    pub depth: usize,
    /// 对象的直接键数量，其余类型为 0
    pub entries: usize,
    pub value: &'a Value,
}

/// 嵌套层级超过绝对上限，`depth` 为首个越界的层级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CeilingExceeded {
    pub depth: usize,
}

impl std::fmt::Display for CeilingExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "nesting exceeds traversal ceiling at depth {}", self.depth)
    }
}

impl std::error::Error for CeilingExceeded {}

/// 结构尺寸：深度与键总数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub depth: usize,
    pub keys: usize,
}

/// 深度优先遍历整棵值树
///
/// 使用显式工作栈，不依赖调用栈深度；每访问完一个节点调用一次 `should_continue`，
/// 返回 `Err` 时立即终止遍历。
pub fn walk<'a, E, V, F>(root: &'a Value, visit: V, should_continue: F) -> Result<(), E>
where
    E: From<CeilingExceeded>,
    V: FnMut(Node<'a>),
    F: FnMut() -> Result<(), E>,
{
    walk_bounded(root, MAX_TRAVERSAL_DEPTH, visit, should_continue)
}

pub(crate) fn walk_bounded<'a, E, V, F>(
    root: &'a Value,
    ceiling: usize,
    mut visit: V,
    mut should_continue: F,
) -> Result<(), E>
where
    E: From<CeilingExceeded>,
    V: FnMut(Node<'a>),
    F: FnMut() -> Result<(), E>,
{
    let mut stack: Vec<(&'a Value, usize)> = vec![(root, 1)];

    while let Some((value, depth)) = stack.pop() {
        if depth > ceiling {
            return Err(CeilingExceeded { depth }.into());
        }

        let (kind, entries) = match value {
            Value::Null => (ValueKind::Null, 0),
            Value::Bool(_) => (ValueKind::Boolean, 0),
            Value::Number(_) => (ValueKind::Number, 0),
            Value::String(_) => (ValueKind::String, 0),
            Value::Array(items) => {
                stack.extend(items.iter().map(|item| (item, depth + 1)));
                (ValueKind::Array, 0)
            }
            Value::Object(map) => {
                stack.extend(map.values().map(|item| (item, depth + 1)));
                (ValueKind::Object, map.len())
            }
        };

        visit(Node {
            kind,
            depth,
            entries,
            value,
        });
        should_continue()?;
    }

    Ok(())
}

/// 一次遍历同时得到深度与键总数
pub fn measure(value: &Value) -> Result<Shape, CeilingExceeded> {
    let mut shape = Shape { depth: 0, keys: 0 };
    walk(
        value,
        |node| {
            shape.depth = shape.depth.max(node.depth);
            shape.keys += node.entries;
        },
        || Ok::<(), CeilingExceeded>(()),
    )?;
    Ok(shape)
}

/// 最大嵌套深度，根节点计为 1，空容器不额外加深
pub fn compute_depth(value: &Value) -> Result<usize, CeilingExceeded> {
    measure(value).map(|shape| shape.depth)
}

/// 整棵树中所有对象的键值对总数
pub fn count_keys(value: &Value) -> Result<usize, CeilingExceeded> {
    measure(value).map(|shape| shape.keys)
}

/// 节点自身在规范文本中占用的 UTF-8 字节数，不含子节点
///
/// 规范文本以 `", "` 分隔元素、以 `": "` 分隔键与值，非 ASCII 字符原样输出，
/// 控制字符按 JSON 转义。对所有节点求和即为整个文档的字节数。
pub fn token_len(value: &Value) -> usize {
    match value {
        Value::Null => 4,
        Value::Bool(true) => 4,
        Value::Bool(false) => 5,
        Value::Number(number) => number.to_string().len(),
        Value::String(text) => quoted_len(text),
        Value::Array(items) => 2 + separators(items.len()),
        Value::Object(map) => {
            let keys: usize = map.keys().map(|key| quoted_len(key) + 2).sum();
            2 + separators(map.len()) + keys
        }
    }
}

fn separators(entries: usize) -> usize {
    entries.saturating_sub(1) * 2
}

fn quoted_len(text: &str) -> usize {
    let body: usize = text
        .chars()
        .map(|c| match c {
            '"' | '\\' | '\u{08}' | '\u{0c}' | '\n' | '\r' | '\t' => 2,
            c if (c as u32) < 0x20 => 6,
            c => c.len_utf8(),
        })
        .sum();
    body + 2
}

/// 逐层拆开并释放整棵值树，析构过程不随嵌套加深而递归
pub fn dismantle(value: Value) {
    let mut pending = vec![value];
    while let Some(value) = pending.pop() {
        match value {
            Value::Array(items) => pending.extend(items),
            Value::Object(map) => pending.extend(map.into_iter().map(|(_, item)| item)),
            _ => {}
        }
    }
}
