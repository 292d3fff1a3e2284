mod picker_session;
