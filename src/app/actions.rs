//! GPUI actions shared by the main window

use gpui::actions;

// ============================================================================
// Sidebar
// ============================================================================

actions!(sidebar, [ToggleSidebar]);

// ============================================================================
// Navigation
// ============================================================================

actions!(navigation, [GoBack, NewConversation]);

// ============================================================================
// Application
// ============================================================================

actions!(chatbar, [Quit]);
