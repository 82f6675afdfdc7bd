use log::debug;
use uuid::Uuid;
use crate::models::{FragmentKind, HtmlFragment, ScriptPage};

/// 分页结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pagination {
    /// 每页合并后的HTML
    pub pages: Vec<ScriptPage>,
    /// 每页的片段列表，对白组合并为一个片段
    pub pages_html: Vec<Vec<String>>,
}

#[derive(Default)]
struct PageBuffer {
    raw: Vec<String>,
    rendered: Vec<String>,
}

/// 分页状态
///
/// 容器打开期间不换页，预定的换页等容器关闭后再生效
#[derive(Default)]
struct PaginationState {
    pages: Vec<PageBuffer>,
    open_containers: usize,
    open_dialogue_groups: usize,
    dialogue_chunk: String,
    placed_on_page: usize,
    advance_pending: bool,
}

impl PaginationState {
    fn current(&mut self) -> &mut PageBuffer {
        if self.pages.is_empty() {
            self.pages.push(PageBuffer::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn advance(&mut self, reason: &str) {
        debug!("第 {} 页结束 ({})，共 {} 个片段", self.pages.len().max(1), reason, self.placed_on_page);
        self.current();
        self.pages.push(PageBuffer::default());
        self.placed_on_page = 0;
        self.advance_pending = false;
    }

    fn place(&mut self, fragment: &HtmlFragment) {
        let mut closes_dialogue_group = false;
        match fragment.kind {
            FragmentKind::Open(container) => {
                self.open_containers += 1;
                if container.is_dialogue_group() {
                    self.open_dialogue_groups += 1;
                }
            }
            FragmentKind::Close(container) => {
                self.open_containers = self.open_containers.saturating_sub(1);
                if container.is_dialogue_group() {
                    self.open_dialogue_groups = self.open_dialogue_groups.saturating_sub(1);
                    closes_dialogue_group = true;
                }
            }
            FragmentKind::Leaf | FragmentKind::PageBreak => {}
        }

        self.current().raw.push(fragment.html.clone());

        if self.open_dialogue_groups > 0 {
            self.dialogue_chunk.push_str(&fragment.html);
        } else if closes_dialogue_group {
            self.dialogue_chunk.push_str(&fragment.html);
            let chunk = std::mem::take(&mut self.dialogue_chunk);
            self.current().rendered.push(chunk);
        } else {
            self.current().rendered.push(fragment.html.clone());
        }

        self.placed_on_page += 1;
    }

    fn finish(mut self) -> Pagination {
        if !self.dialogue_chunk.is_empty() {
            let chunk = std::mem::take(&mut self.dialogue_chunk);
            self.current().rendered.push(chunk);
        }

        let mut pagination = Pagination::default();
        for page in self.pages.into_iter().filter(|p| !p.raw.is_empty()) {
            pagination.pages.push(ScriptPage {
                id: Uuid::new_v4().to_string(),
                html: page.raw.concat(),
            });
            pagination.pages_html.push(page.rendered);
        }
        pagination
    }
}

/// 把扁平的HTML片段序列切分成页
///
/// 分页符片段立即换页且本身不输出；设置了预算时，片段在整个序列中的位置
/// 每到预算的整数倍就预定换页，等所有打开的容器关闭后生效。
/// 位置计数包含分页符，换页不会让计数归零。预算为 None 时只有分页符会换页。
pub fn paginate(fragments: &[HtmlFragment], line_budget: Option<usize>) -> Pagination {
    let budget = line_budget.filter(|b| *b > 0);
    let mut state = PaginationState::default();

    for (position, fragment) in fragments.iter().enumerate() {
        if fragment.kind == FragmentKind::PageBreak {
            if state.open_containers == 0 {
                state.advance("分页符");
            } else {
                state.advance_pending = true;
            }
            continue;
        }

        if state.advance_pending && state.open_containers == 0 {
            state.advance("行数预算");
        }

        state.place(fragment);

        if let Some(budget) = budget {
            if position != 0 && position % budget == 0 {
                state.advance_pending = true;
            }
        }
    }

    state.finish()
}
