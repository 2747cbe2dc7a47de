//! Menus, context menus with previews, and their subwindow variants.

use uitree::{AnimationOption, AnimationTarget, Curve, NodeId, OffsetF, RectF};

use super::OverlayManager;
use crate::error::{OverlayError, Result};
use crate::pattern::{MenuOptions, MenuPattern, MenuState, MenuWrapperPattern, Pattern};
use crate::task::Completion;

impl OverlayManager {
    /// Build a wrapper holding the menu and, for preview menus, a preview.
    pub fn create_menu_node(&mut self, target_id: i32, options: MenuOptions) -> NodeId {
        let mut options = options;
        let wrapper_pattern = MenuWrapperPattern::new(target_id, &mut options);
        let has_preview = wrapper_pattern.has_preview();
        let root_size = self.context.root_size();
        let arena = &mut self.context.arena;
        let wrapper = arena.create("menu-wrapper", Pattern::MenuWrapper(wrapper_pattern));
        let menu = arena.create(
            "menu",
            Pattern::Menu(MenuPattern {
                target_id,
                items: options.items,
                ..MenuPattern::default()
            }),
        );
        arena.mount(menu, wrapper);
        if has_preview {
            let preview = arena.create("menu-preview", Pattern::MenuPreview);
            arena.mount(preview, wrapper);
        }
        if let Some(node) = arena.get_mut(wrapper) {
            node.frame.set_size(root_size);
        }
        wrapper
    }

    pub fn get_menu_node(&self, target_id: i32) -> Option<NodeId> {
        self.menu_map.get(&target_id).copied()
    }

    pub fn menu_state(&self, wrapper: NodeId) -> Option<MenuState> {
        self.pattern_of(wrapper)
            .and_then(Pattern::as_menu_wrapper)
            .map(|w| w.state)
    }

    fn wrapper_mut(&mut self, wrapper: NodeId) -> Result<&mut MenuWrapperPattern> {
        self.context
            .arena
            .pattern_mut(wrapper)
            .ok_or(OverlayError::NodeGone(wrapper))?
            .as_menu_wrapper_mut()
            .ok_or(OverlayError::WrongPattern {
                node: wrapper,
                expected: "menu wrapper",
            })
    }

    /// Child 0 of a wrapper is the menu.
    fn set_menu_position(&mut self, wrapper: NodeId, offset: OffsetF) {
        let Some(menu) = self.context.arena.first_child(wrapper) else {
            return;
        };
        if let Some(node) = self.context.arena.get_mut(menu) {
            node.frame.set_offset(offset);
            node.render.position = None;
        }
        if let Some(pattern) = self.pattern_of_mut(menu).and_then(Pattern::as_menu_mut) {
            pattern.offset = offset;
            pattern.end_offset = offset;
        }
    }

    /// Show the menu registered for `target_id`, or `menu` when given.
    ///
    /// A menu already showing only moves.
    pub fn show_menu(&mut self, target_id: i32, offset: OffsetF, menu: Option<NodeId>) {
        log::debug!("show menu for target {target_id}");
        if let Err(e) = self.try_show_menu(target_id, offset, menu, false) {
            log::debug!("show menu skipped: {e}");
        }
    }

    fn try_show_menu(
        &mut self,
        target_id: i32,
        offset: OffsetF,
        menu: Option<NodeId>,
        in_subwindow: bool,
    ) -> Result<()> {
        let wrapper = match menu {
            Some(menu) => {
                // One menu per target: a new wrapper replaces the one on show
                if let Some(stale) = self.menu_map.insert(target_id, menu)
                    && stale != menu
                    && self.is_on_root(stale)
                {
                    log::debug!("menu {stale} for target {target_id} replaced by {menu}");
                    self.unmount_menu_now(stale);
                }
                menu
            }
            None => self
                .get_menu_node(target_id)
                .ok_or(OverlayError::MenuNotFound(target_id))?,
        };
        let state = self.wrapper_mut(wrapper)?.state;
        match state {
            MenuState::Shown | MenuState::AnimatingIn | MenuState::Mounting
                if self.is_on_root(wrapper) =>
            {
                self.set_menu_position(wrapper, offset);
                return Ok(());
            }
            MenuState::AnimatingOut => {
                if let Some(id) = self.wrapper_mut(wrapper)?.exit_animation.take() {
                    self.context.animator.stop(id);
                }
                self.context.animator.stop_node(wrapper);
                for child in self.context.arena.children(wrapper).to_vec() {
                    self.context.animator.stop_node(child);
                }
                self.reset_menu_render(wrapper);
            }
            _ => {}
        }

        self.set_menu_position(wrapper, offset);
        {
            let pattern = self.wrapper_mut(wrapper)?;
            pattern.in_subwindow = in_subwindow;
            pattern.state = MenuState::Mounting;
        }
        if !self.is_on_root(wrapper) {
            let root = self.context.root();
            self.context.arena.mount(wrapper, root);
        }
        self.show_menu_animation(wrapper)
    }

    fn show_menu_animation(&mut self, wrapper: NodeId) -> Result<()> {
        let in_subwindow = {
            let pattern = self.wrapper_mut(wrapper)?;
            pattern.call_about_to_appear();
            pattern.state = MenuState::AnimatingIn;
            pattern.in_subwindow
        };
        if !in_subwindow {
            self.blur_lower_node(wrapper);
        }
        self.play_transition(wrapper, true, Some(Completion::MenuShown { wrapper }));
        Ok(())
    }

    pub(super) fn on_menu_shown(&mut self, wrapper: NodeId) {
        if self.menu_state(wrapper) != Some(MenuState::AnimatingIn) {
            return;
        }
        self.focus_overlay_node(wrapper);
        if let Ok(pattern) = self.wrapper_mut(wrapper) {
            pattern.state = MenuState::Shown;
            pattern.call_on_appear();
        }
    }

    pub fn hide_menu(&mut self, menu: NodeId, target_id: i32) {
        log::debug!("hide menu for target {target_id}");
        match self.try_hide_menu(menu) {
            Ok(()) => {}
            Err(e @ OverlayError::AlreadyRemoving(_)) => log::warn!("hide menu rejected: {e}"),
            Err(e) => log::debug!("hide menu skipped: {e}"),
        }
    }

    fn try_hide_menu(&mut self, wrapper: NodeId) -> Result<()> {
        if !self.is_on_root(wrapper) {
            return Err(OverlayError::NotMounted(wrapper));
        }
        let (has_preview, in_subwindow) = {
            let pattern = self.wrapper_mut(wrapper)?;
            if pattern.state == MenuState::AnimatingOut {
                return Err(OverlayError::AlreadyRemoving(wrapper));
            }
            (pattern.has_preview(), pattern.in_subwindow)
        };
        if !in_subwindow {
            self.reset_lower_node_focusable(wrapper);
        }
        {
            let pattern = self.wrapper_mut(wrapper)?;
            pattern.call_about_to_disappear();
            pattern.state = MenuState::AnimatingOut;
        }
        let completion = Some(Completion::MenuHidden { wrapper });
        let exit = if has_preview {
            self.play_context_menu_exit(wrapper, completion)
        } else {
            self.play_transition(wrapper, false, completion)
        };
        self.wrapper_mut(wrapper)?.exit_animation = exit;
        Ok(())
    }

    /// Three concurrent animations; only the content fade detaches.
    fn play_context_menu_exit(
        &mut self,
        wrapper: NodeId,
        completion: Option<Completion>,
    ) -> Option<uitree::AnimationId> {
        let theme = self.context.theme().menu().clone();
        let menu = self.context.arena.first_child(wrapper)?;
        let preview = self
            .context
            .arena
            .children(wrapper)
            .iter()
            .copied()
            .find(|c| matches!(self.pattern_of(*c), Some(Pattern::MenuPreview)));
        let end_offset = self
            .pattern_of_mut(menu)
            .and_then(Pattern::as_menu_mut)
            .map(|m| m.end_offset)
            .unwrap_or(OffsetF::ZERO);
        let spring = Curve::responsive(
            theme.preview_disappear_spring_response,
            theme.preview_disappear_spring_damping,
        );

        let fade = self.animate(
            menu,
            AnimationOption::millis(theme.disappear_duration_ms, Curve::FRICTION),
            [AnimationTarget::Opacity(0.0)],
            completion,
        );
        if let Some(preview) = preview {
            self.animate(
                preview,
                AnimationOption::spring(spring),
                [AnimationTarget::Scale(theme.menu_animation_scale)],
                None,
            );
        }
        self.animate(
            menu,
            AnimationOption::spring(spring),
            [AnimationTarget::Position(end_offset)],
            None,
        );
        Some(fade)
    }

    pub(super) fn on_menu_hidden(&mut self, wrapper: NodeId, id: uitree::AnimationId) {
        let Ok(pattern) = self.wrapper_mut(wrapper) else {
            return;
        };
        if pattern.state != MenuState::AnimatingOut || pattern.exit_animation != Some(id) {
            return;
        }
        pattern.exit_animation = None;
        pattern.state = MenuState::Unmounted;
        pattern.call_on_disappear();
        let in_subwindow = pattern.in_subwindow;
        self.blur_overlay_node(wrapper);
        self.context.arena.detach(wrapper);
        for child in self.context.arena.children(wrapper).to_vec() {
            self.context.animator.stop_node(child);
        }
        self.reset_menu_render(wrapper);
        if in_subwindow {
            self.hide_subwindow_if_empty();
        }
    }

    /// Undo exit-only render changes so the node can be shown again.
    fn reset_menu_render(&mut self, wrapper: NodeId) {
        for child in self.context.arena.children(wrapper).to_vec() {
            self.apply(
                child,
                [AnimationTarget::Opacity(1.0), AnimationTarget::Scale(1.0)],
            );
            if let Some(node) = self.context.arena.get_mut(child) {
                node.render.position = None;
            }
        }
    }

    pub fn hide_all_menus(&mut self) {
        let menus: Vec<(i32, NodeId)> = self.menu_map.iter().map(|(t, n)| (*t, *n)).collect();
        for (target_id, wrapper) in menus {
            if self.is_on_root(wrapper) {
                self.hide_menu(wrapper, target_id);
            }
        }
    }

    /// Forget the menu for `target_id` and destroy its node.
    pub fn delete_menu(&mut self, target_id: i32) {
        let Some(wrapper) = self.menu_map.remove(&target_id) else {
            return;
        };
        log::debug!("delete menu for target {target_id}");
        if self.is_on_root(wrapper) {
            self.blur_overlay_node(wrapper);
        }
        self.context.animator.stop_node(wrapper);
        self.context.arena.destroy(wrapper);
    }

    /// Show a menu in this subwindow surface.
    ///
    /// `offset` is in window coordinates; the subwindow origin is removed
    /// and anything else on the subwindow root is cleared first.
    pub fn show_menu_in_subwindow(
        &mut self,
        target_id: i32,
        offset: OffsetF,
        menu: Option<NodeId>,
        subwindow_rect: RectF,
    ) {
        log::debug!("show menu in subwindow for target {target_id}");
        let local = offset - subwindow_rect.offset();
        let keep = menu.or_else(|| self.get_menu_node(target_id));
        for child in self.overlay_children() {
            if Some(child) != keep {
                self.context.arena.detach(child);
            }
        }
        self.context.show_subwindow();
        if let Err(e) = self.try_show_menu(target_id, local, menu, true) {
            log::debug!("show menu in subwindow skipped: {e}");
        }
    }

    pub fn hide_menu_in_subwindow(&mut self, menu: NodeId, target_id: i32) {
        self.hide_menu(menu, target_id);
    }

    pub fn hide_all_menus_in_subwindow(&mut self) {
        for child in self.overlay_children() {
            let wrapper = self.pattern_of(child).and_then(Pattern::as_menu_wrapper);
            let Some((target_id, in_subwindow)) = wrapper.map(|w| (w.target_id, w.in_subwindow))
            else {
                continue;
            };
            if in_subwindow {
                self.hide_menu(child, target_id);
            }
        }
    }

    /// Detach every menu wrapper without animation.
    pub fn clean_menu_in_subwindow(&mut self) {
        for child in self.overlay_children() {
            self.unmount_menu_now(child);
        }
    }

    /// Detach a mounted wrapper without animation, ready to show again.
    fn unmount_menu_now(&mut self, wrapper: NodeId) {
        let Ok(pattern) = self.wrapper_mut(wrapper) else {
            return;
        };
        let was_shown = pattern.state != MenuState::Unmounted;
        pattern.state = MenuState::Unmounted;
        pattern.exit_animation = None;
        let in_subwindow = pattern.in_subwindow;
        if was_shown && !in_subwindow {
            self.reset_lower_node_focusable(wrapper);
            self.blur_overlay_node(wrapper);
        }
        self.context.animator.stop_node(wrapper);
        for child in self.context.arena.children(wrapper).to_vec() {
            self.context.animator.stop_node(child);
        }
        self.context.arena.detach(wrapper);
        self.reset_menu_render(wrapper);
    }

    /// Drop preview nodes from every mounted wrapper.
    pub fn clean_preview_in_subwindow(&mut self) {
        for child in self.overlay_children() {
            if self.pattern_of(child).and_then(Pattern::as_menu_wrapper).is_none() {
                continue;
            }
            let previews: Vec<NodeId> = self
                .context
                .arena
                .children(child)
                .iter()
                .copied()
                .filter(|c| matches!(self.pattern_of(*c), Some(Pattern::MenuPreview)))
                .collect();
            for preview in previews {
                self.context.animator.stop_node(preview);
                self.context.arena.destroy(preview);
            }
        }
    }
}
